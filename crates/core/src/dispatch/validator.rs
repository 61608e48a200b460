//! Upload validation against the catalog.

use crate::catalog::Resolver;

use super::error::ConvertError;

/// Decides whether an incoming file is acceptable before any conversion
/// work begins.
///
/// Rules, in order:
/// 1. If `from` or `to` is absent, accept provisionally; the dispatcher
///    re-validates once the full request is known.
/// 2. An unresolvable pair (no rule, or tool unavailable) is rejected as
///    unsupported.
/// 3. A declared MIME type outside the rule's accepted set is rejected
///    as a mismatch.
pub fn validate_upload(
    resolver: &Resolver,
    declared_mime: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(), ConvertError> {
    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        // Format-agnostic intake; validation is deferred to dispatch.
        _ => return Ok(()),
    };

    let rule = resolver
        .resolve(from, to)
        .ok_or_else(|| ConvertError::unsupported(from, to))?;

    if !rule.accepts_mime(declared_mime) {
        return Err(ConvertError::MimeMismatch {
            mime: declared_mime.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    Ok(())
}
