use crate::types::{CalloutRecord, DiagnosticEntry, DiagnosticHandle, SRC6_KEY};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("entry {0}: empty message")]
    EmptyMessage(usize),
    #[error("entry {0}: user data does not end with {SRC6_KEY}")]
    MissingSrc6(usize),
    #[error("entry {0}: {SRC6_KEY} appears before the end of the user data")]
    MisplacedSrc6(usize),
    #[error("entry {0}: empty user data key at position {1}")]
    EmptyUserDataKey(usize, usize),
    #[error("entry {0}: procedure callout {1} has no procedure name")]
    EmptyProcedure(usize, usize),
    #[error("entry {0}: target callout {1} has an empty entity path")]
    EmptyEntityPath(usize, usize),
}

/// Validate one entry for structural consistency. `index` is used in the
/// reported errors.
pub fn validate_entry(index: usize, entry: &DiagnosticEntry, errors: &mut Vec<ValidationError>) {
    if entry.message().is_empty() {
        errors.push(ValidationError::EmptyMessage(index));
    }

    let user_data = entry.user_data();
    match user_data.last() {
        Some((key, _)) if key == SRC6_KEY => {
            if user_data[..user_data.len() - 1]
                .iter()
                .any(|(k, _)| k == SRC6_KEY)
            {
                errors.push(ValidationError::MisplacedSrc6(index));
            }
        }
        _ => errors.push(ValidationError::MissingSrc6(index)),
    }

    for (pos, (key, _)) in user_data.iter().enumerate() {
        if key.is_empty() {
            errors.push(ValidationError::EmptyUserDataKey(index, pos));
        }
    }

    for (pos, callout) in entry.callouts().iter().enumerate() {
        match callout {
            CalloutRecord::Procedure(p) if p.procedure.is_empty() => {
                errors.push(ValidationError::EmptyProcedure(index, pos));
            }
            CalloutRecord::Target(t) if t.entity_path.is_empty() => {
                errors.push(ValidationError::EmptyEntityPath(index, pos));
            }
            _ => {}
        }
    }
}

/// Validate every entry of a handle.
pub fn validate_handle(handle: &DiagnosticHandle) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if handle.is_empty() {
        log::warn!("diagnostic handle has no entries");
    }

    for (index, entry) in handle.iter().enumerate() {
        validate_entry(index, entry, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
