//! resolve
//!
//! Positional-argument parsing and URL resolution.
//!
//! # Design
//!
//! Resolution happens in two stages. [`parse`] is pure: it turns the
//! positional arguments into a [`Target`] and rejects malformed shapes
//! (a reversed line range, a line anchor without a path) before any
//! network or filesystem access. [`resolve`] then validates every named
//! ref against the repository and substitutes the host's template.
//!
//! # Argument grammar
//!
//! - nothing - the currently checked-out commit
//! - `REV` - a branch, tag, commit, or any rev-parse expression
//! - `REV:PATH` - a file at a ref
//! - `REV:PATH#L10` / `REV:PATH#L10-L20` - a file with a line anchor
//! - `LHS..RHS` / `LHS...RHS` - a comparison between two refs

use thiserror::Error;

use crate::host::Host;
use crate::repo::{RepoError, RepoHandle};

/// Errors from target parsing and URL resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The positional arguments have an invalid shape.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        /// What was wrong with the shape
        message: String,
    },

    /// The host has no compare view.
    #[error("{host} does not support comparing commits")]
    CompareNotSupported {
        /// The detected host
        host: String,
    },

    /// The host only accepts three-dot comparisons.
    #[error("{host} does not support '..' comparisons; use '...' instead")]
    TwoDotCompareNotSupported {
        /// The detected host
        host: String,
    },

    /// Ref resolution or repository access failed.
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// A comparison operator between two refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `..`
    TwoDots,
    /// `...`
    ThreeDots,
}

impl CompareOp {
    /// The operator as it appears in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::TwoDots => "..",
            CompareOp::ThreeDots => "...",
        }
    }
}

/// A line anchor within a file view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First line, 1-based
    pub start: u32,
    /// Last line; `None` for a single-line anchor
    pub end: Option<u32>,
}

/// The parsed user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// No arguments: the currently checked-out commit
    Head,
    /// A single revision
    Rev {
        /// The revision as given
        rev: String,
    },
    /// A file at a revision, optionally with a line anchor
    File {
        /// The revision as given
        rev: String,
        /// Path within the repository
        path: String,
        /// Optional line anchor
        lines: Option<LineRange>,
    },
    /// A comparison between two revisions
    Compare {
        /// Left-hand revision
        lhs: String,
        /// Right-hand revision
        rhs: String,
        /// The comparison operator
        op: CompareOp,
    },
}

/// Parse positional arguments into a [`Target`].
///
/// Pure function; performs no repository access. Shape errors (too many
/// arguments, reversed line ranges, empty comparison sides) are caught
/// here so they fail before any I/O.
pub fn parse(args: &[String]) -> Result<Target, ResolveError> {
    match args {
        [] => Ok(Target::Head),
        [arg] => parse_single(arg),
        _ => Err(ResolveError::InvalidArguments {
            message: format!("expected at most one positional argument, got {}", args.len()),
        }),
    }
}

fn parse_single(arg: &str) -> Result<Target, ResolveError> {
    let invalid = |message: String| ResolveError::InvalidArguments { message };

    // Three dots first: splitting on ".." would cut "a...b" wrong.
    for (op, symbol) in [(CompareOp::ThreeDots, "..."), (CompareOp::TwoDots, "..")] {
        if let Some((lhs, rhs)) = arg.split_once(symbol) {
            if lhs.is_empty() || rhs.is_empty() {
                return Err(invalid(format!(
                    "both sides of '{}' need a ref in '{}'",
                    symbol, arg
                )));
            }
            return Ok(Target::Compare {
                lhs: lhs.to_string(),
                rhs: rhs.to_string(),
                op,
            });
        }
    }

    match arg.split_once(':') {
        Some((rev, rest)) => {
            if rev.is_empty() || rest.is_empty() {
                return Err(invalid(format!("expected REV:PATH, got '{}'", arg)));
            }
            let (path, lines) = split_line_anchor(rest)?;
            if path.is_empty() {
                return Err(invalid("a line anchor requires a file path".to_string()));
            }
            Ok(Target::File {
                rev: rev.to_string(),
                path,
                lines,
            })
        }
        None if arg.contains("#L") => {
            Err(invalid("a line anchor requires a file path".to_string()))
        }
        None => Ok(Target::Rev {
            rev: arg.to_string(),
        }),
    }
}

/// Split `PATH#L10-L20` into the path and its line anchor.
fn split_line_anchor(input: &str) -> Result<(String, Option<LineRange>), ResolveError> {
    let invalid = |message: String| ResolveError::InvalidArguments { message };

    let Some((path, anchor)) = input.split_once('#') else {
        return Ok((input.to_string(), None));
    };

    let malformed = || {
        invalid(format!(
            "malformed line anchor '#{}'; expected #L10 or #L10-L20",
            anchor
        ))
    };

    let spec = anchor.strip_prefix('L').ok_or_else(malformed)?;
    let (start, end) = match spec.split_once('-') {
        Some((start, end)) => (start, Some(end.strip_prefix('L').ok_or_else(malformed)?)),
        None => (spec, None),
    };

    let start: u32 = start.parse().map_err(|_| malformed())?;
    let end: Option<u32> = match end {
        Some(end) => Some(end.parse().map_err(|_| malformed())?),
        None => None,
    };

    if let Some(end) = end {
        if end < start {
            return Err(invalid(format!(
                "line range ends before it starts: L{}-L{}",
                start, end
            )));
        }
    }

    Ok((path.to_string(), Some(LineRange { start, end })))
}

/// Resolve a [`Target`] into a URL on the detected host.
///
/// Every named ref is validated through the repository handle; branch
/// and tag names are substituted verbatim, everything else as the full
/// commit id.
///
/// # Errors
///
/// - [`ResolveError::Repo`] wrapping [`RepoError::RefNotFound`] for an
///   unresolvable ref
/// - [`ResolveError::CompareNotSupported`] /
///   [`ResolveError::TwoDotCompareNotSupported`] for host quirks
pub fn resolve(
    handle: &RepoHandle,
    host: &Host,
    owner: &str,
    repo: &str,
    target: &Target,
) -> Result<String, ResolveError> {
    let template = host.template();
    let fill = |pattern: &str| {
        pattern
            .replace("{host}", host.domain())
            .replace("{owner}", owner)
            .replace("{repo}", repo)
    };

    let url = match target {
        Target::Head => {
            let head = handle.head()?;
            fill(template.commit).replace("{ref}", &head.commit)
        }

        Target::Rev { rev } => {
            let resolved = handle.resolve(rev)?;
            match &resolved.name {
                Some(name) => fill(template.branch).replace("{ref}", name),
                None => fill(template.commit).replace("{ref}", &resolved.commit),
            }
        }

        Target::File { rev, path, lines } => {
            let resolved = handle.resolve(rev)?;
            let mut url = fill(template.file)
                .replace("{ref}", resolved.url_ref())
                .replace("{path}", path);
            if let Some(range) = lines {
                let anchor = match range.end {
                    Some(end) => template
                        .range_anchor
                        .replace("{line}", &range.start.to_string())
                        .replace("{line_end}", &end.to_string()),
                    None => template
                        .line_anchor
                        .replace("{line}", &range.start.to_string()),
                };
                url.push_str(&anchor);
            }
            url
        }

        Target::Compare { lhs, rhs, op } => {
            let pattern = template
                .compare
                .ok_or_else(|| ResolveError::CompareNotSupported {
                    host: host.domain().to_string(),
                })?;
            if *op == CompareOp::TwoDots && !template.two_dot_compare {
                return Err(ResolveError::TwoDotCompareNotSupported {
                    host: host.domain().to_string(),
                });
            }
            let lhs = handle.resolve(lhs)?;
            let rhs = handle.resolve(rhs)?;
            fill(pattern)
                .replace("{ref_end}", rhs.url_ref())
                .replace("{ref}", lhs.url_ref())
                .replace("{op}", op.as_str())
        }
    };

    Ok(url)
}
