//! MR title and description from a commit message

/// Title and description for an MR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrContent {
    /// MR title
    pub title: String,
    /// MR description
    pub description: String,
}

/// Split a commit message into an MR title and description.
///
/// The first line is the title. The description is `body_override` when it is
/// non-empty, otherwise whatever follows the first line with the separating
/// blank lines removed. A single-line message has an empty description unless
/// overridden.
pub fn split_commit_message(message: &str, body_override: Option<&str>) -> MrContent {
    let body_override = body_override.filter(|b| !b.is_empty());

    match message.split_once('\n') {
        Some((first, rest)) => MrContent {
            title: first.trim_end_matches('\r').to_string(),
            description: body_override.map_or_else(
                || rest.trim_start_matches(['\r', '\n']).to_string(),
                ToString::to_string,
            ),
        },
        None => MrContent {
            title: message.to_string(),
            description: body_override.unwrap_or_default().to_string(),
        },
    }
}
