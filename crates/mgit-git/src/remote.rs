//! Git remote listing.

use serde::Serialize;

/// A registered remote with its URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    /// Remote name (e.g., "origin", "upstream").
    pub name: String,
    /// Fetch URL.
    pub fetch_url: String,
    /// Push URL, when listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_url: Option<String>,
}

impl Remote {
    /// Parse `git remote -v` output, merging fetch and push lines per remote.
    /// The result is sorted by name.
    pub fn parse_remotes(output: &str) -> Vec<Self> {
        let mut remotes: Vec<Self> = Vec::new();

        for line in output.lines() {
            let mut parts = line.split_whitespace();
            let (Some(name), Some(url), Some(direction)) = (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            let is_push = direction.trim_matches(|c| c == '(' || c == ')') == "push";

            if let Some(existing) = remotes.iter_mut().find(|r| r.name == name) {
                if is_push {
                    existing.push_url = Some(url.to_string());
                }
                continue;
            }
            remotes.push(Self {
                name: name.to_string(),
                fetch_url: url.to_string(),
                push_url: is_push.then(|| url.to_string()),
            });
        }

        remotes.sort_by(|a, b| a.name.cmp(&b.name));
        remotes
    }
}
