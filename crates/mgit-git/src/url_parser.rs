//! Remote identifier parsing.
//!
//! Two grammars are accepted:
//! - URL form, `scheme://[user@]host[:port]/owner[/owner...]/repo[.git]`
//! - shorthand form, `[user@]host:owner[/owner...]/repo[.git]`, always SSH
//!
//! Anything containing `://` takes the URL branch; everything else must match
//! the shorthand pattern.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::errors::RemoteParseError;

static SHORTHAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<user>[^@]+)@)?(?P<host>[^:/]+):(?P<path>.+)$")
        .expect("shorthand remote pattern is a valid regex")
});

/// Connection mechanism implied by a remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// `ssh://` URLs and the shorthand form.
    Ssh,
    /// `https://` URLs.
    Https,
    /// Any other scheme (`http`, `git`, `file`, ...).
    Other,
}

impl Transport {
    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Https => "https",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured description of a remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteDescriptor {
    /// Input as given, trimmed.
    pub original: String,
    /// Transport derived from the scheme.
    pub transport: Transport,
    /// Lower-cased scheme; `ssh` for the shorthand form.
    pub scheme: String,
    /// User from the user-info or `user@` prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Host name, never empty.
    pub host: String,
    /// Explicit port, URL form only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Ownership path, possibly nested (`Group/subgroup`).
    pub owner: String,
    /// Repository name without `.git`.
    pub repo: String,
    /// Full repository path with empty segments removed.
    pub path: String,
}

impl RemoteDescriptor {
    /// Whether the remote uses SSH.
    pub fn is_ssh(&self) -> bool {
        self.transport == Transport::Ssh
    }

    /// Whether the remote uses HTTPS.
    pub fn is_https(&self) -> bool {
        self.transport == Transport::Https
    }

    /// Whether host, owner and repository are all populated.
    ///
    /// Always true for descriptors built by [`parse`], which fails instead
    /// of returning a partial descriptor.
    pub fn is_well_formed(&self) -> bool {
        !self.host.is_empty() && !self.owner.is_empty() && !self.repo.is_empty()
    }
}

/// Parse a remote identifier.
///
/// # Examples
///
/// ```
/// use mgit_git::url_parser::parse;
///
/// let remote = parse("git@github.com:CompanyOrg/service.git").unwrap();
/// assert_eq!(remote.host, "github.com");
/// assert_eq!(remote.owner, "CompanyOrg");
/// assert_eq!(remote.repo, "service");
/// ```
pub fn parse(input: &str) -> Result<RemoteDescriptor, RemoteParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RemoteParseError::Malformed);
    }
    if trimmed.contains("://") {
        parse_url_form(trimmed)
    } else {
        parse_shorthand(trimmed)
    }
}

/// Cheap check for whether a command-line token names a remote by URL rather
/// than by registered name. Never fails.
pub fn looks_like_remote_url(token: &str) -> bool {
    token.contains("://") || SHORTHAND_RE.is_match(token)
}

fn parse_url_form(input: &str) -> Result<RemoteDescriptor, RemoteParseError> {
    let url = Url::parse(input).map_err(|e| match e {
        url::ParseError::EmptyHost => RemoteParseError::MissingHost {
            input: input.to_string(),
        },
        source => RemoteParseError::InvalidUrl {
            input: input.to_string(),
            source,
        },
    })?;

    let host = url
        .host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
        .filter(|h| !h.is_empty())
        .ok_or_else(|| RemoteParseError::MissingHost {
            input: input.to_string(),
        })?
        .to_string();

    let split = split_repo_path(&percent_decode(url.path()))?;

    let scheme = url.scheme().to_ascii_lowercase();
    let transport = match scheme.as_str() {
        "ssh" => Transport::Ssh,
        "https" => Transport::Https,
        _ => Transport::Other,
    };
    let user = Some(percent_decode(url.username()).into_owned()).filter(|u| !u.is_empty());

    Ok(RemoteDescriptor {
        original: input.to_string(),
        transport,
        scheme,
        user,
        host,
        port: url.port(),
        owner: split.owner,
        repo: split.repo,
        path: split.path,
    })
}

fn parse_shorthand(input: &str) -> Result<RemoteDescriptor, RemoteParseError> {
    let caps = SHORTHAND_RE
        .captures(input)
        .ok_or_else(|| RemoteParseError::UnsupportedFormat {
            input: input.to_string(),
        })?;

    let split = split_repo_path(&caps["path"])?;

    Ok(RemoteDescriptor {
        original: input.to_string(),
        transport: Transport::Ssh,
        scheme: "ssh".to_string(),
        user: caps.name("user").map(|m| m.as_str().to_string()),
        host: caps["host"].to_string(),
        port: None,
        owner: split.owner,
        repo: split.repo,
        path: split.path,
    })
}

fn percent_decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

struct SplitPath {
    owner: String,
    repo: String,
    path: String,
}

fn split_repo_path(raw: &str) -> Result<SplitPath, RemoteParseError> {
    let mut p = raw.trim();
    p = p.strip_prefix('/').unwrap_or(p);
    p = p.strip_prefix("./").unwrap_or(p);
    p = p.strip_suffix('/').unwrap_or(p);

    let segments: Vec<&str> = p.split('/').filter(|s| !s.is_empty()).collect();
    let Some((last, owner_segments)) = segments.split_last().filter(|_| segments.len() >= 2)
    else {
        return Err(RemoteParseError::IncompleteRepositoryPath {
            path: raw.to_string(),
        });
    };

    let repo = last.strip_suffix(".git").unwrap_or(last);
    if repo.is_empty() {
        return Err(RemoteParseError::InvalidRepositoryName {
            path: raw.to_string(),
        });
    }

    let owner = clean_segments(owner_segments);
    if owner.is_empty() {
        return Err(RemoteParseError::InvalidOwnershipPath {
            path: raw.to_string(),
        });
    }

    Ok(SplitPath {
        owner,
        repo: repo.to_string(),
        path: segments.join("/"),
    })
}

/// Lexical clean of a relative path: `.` dropped, `..` folded into the
/// preceding segment when there is one.
fn clean_segments(segments: &[&str]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(segments.len());
    for &seg in segments {
        match seg {
            "." => {}
            ".." if out.last().is_some_and(|prev| *prev != "..") => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out.join("/")
}
