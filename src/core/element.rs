//! Pipeline element variants and their token encoding.
//!
//! Every element is one atomic path transformation. An element encodes to a
//! single token (tag plus `,`-separated parameters) and a pipeline is a
//! `;`-separated sequence of tokens. `\` escapes the delimiters and itself
//! inside parameter values, so a token never needs lookahead past a
//! delimiter to decode.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separates element tokens inside an encoded pipeline.
pub const ELEMENT_DELIMITER: char = ';';
/// Separates the tag and parameters inside a token.
pub const PARAM_DELIMITER: char = ',';

const ESCAPE: char = '\\';

/// Stable per-variant type tag. Used as the encode discriminator and for
/// the duplicate check in `Pipeline::is_simple`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    ApplyPlugin,
    Quotes,
    OptionalQuotes,
    EmailLink,
    EncodeWhitespace,
    BackToForwardSlashes,
    ForwardToBackslashes,
    RemoveExtension,
    AppendSuffix,
    Uppercase,
    Lowercase,
    Trim,
    FindReplace,
    Regex,
}

impl ElementKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::ApplyPlugin => "apply",
            ElementKind::Quotes => "quotes",
            ElementKind::OptionalQuotes => "optquotes",
            ElementKind::EmailLink => "email",
            ElementKind::EncodeWhitespace => "encodews",
            ElementKind::BackToForwardSlashes => "fslash",
            ElementKind::ForwardToBackslashes => "bslash",
            ElementKind::RemoveExtension => "noext",
            ElementKind::AppendSuffix => "suffix",
            ElementKind::Uppercase => "upper",
            ElementKind::Lowercase => "lower",
            ElementKind::Trim => "trim",
            ElementKind::FindReplace => "replace",
            ElementKind::Regex => "regex",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "apply" => Some(ElementKind::ApplyPlugin),
            "quotes" => Some(ElementKind::Quotes),
            "optquotes" => Some(ElementKind::OptionalQuotes),
            "email" => Some(ElementKind::EmailLink),
            "encodews" => Some(ElementKind::EncodeWhitespace),
            "fslash" => Some(ElementKind::BackToForwardSlashes),
            "bslash" => Some(ElementKind::ForwardToBackslashes),
            "noext" => Some(ElementKind::RemoveExtension),
            "suffix" => Some(ElementKind::AppendSuffix),
            "upper" => Some(ElementKind::Uppercase),
            "lower" => Some(ElementKind::Lowercase),
            "trim" => Some(ElementKind::Trim),
            "replace" => Some(ElementKind::FindReplace),
            "regex" => Some(ElementKind::Regex),
            _ => None,
        }
    }

    /// Human-readable label for CLI listings.
    pub fn label(&self) -> &'static str {
        match self {
            ElementKind::ApplyPlugin => "Apply plugin",
            ElementKind::Quotes => "Surround with quotes",
            ElementKind::OptionalQuotes => "Quote if path contains spaces",
            ElementKind::EmailLink => "Wrap as email link",
            ElementKind::EncodeWhitespace => "Encode whitespace",
            ElementKind::BackToForwardSlashes => "Backslashes to forward slashes",
            ElementKind::ForwardToBackslashes => "Forward slashes to backslashes",
            ElementKind::RemoveExtension => "Remove file extension",
            ElementKind::AppendSuffix => "Append suffix",
            ElementKind::Uppercase => "Uppercase",
            ElementKind::Lowercase => "Lowercase",
            ElementKind::Trim => "Trim whitespace",
            ElementKind::FindReplace => "Find and replace",
            ElementKind::Regex => "Regular expression replace",
        }
    }
}

/// Why a single token failed to decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unrecognized element '{0}'")]
    MalformedToken(String),

    #[error("invalid parameter for '{tag}': {problem}")]
    InvalidParameter { tag: &'static str, problem: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PipelineElement {
    /// Delegates the transformation to a registered plugin. The executor
    /// resolves the id; `apply` leaves the path untouched.
    ApplyPlugin { plugin_id: String },
    Quotes,
    OptionalQuotes,
    EmailLink,
    EncodeWhitespace,
    BackToForwardSlashes,
    ForwardToBackslashes,
    RemoveExtension,
    AppendSuffix { suffix: String },
    Uppercase,
    Lowercase,
    Trim,
    FindReplace { find: String, replace: String },
    Regex {
        pattern: String,
        replacement: String,
        ignore_case: bool,
    },
}

impl PipelineElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            PipelineElement::ApplyPlugin { .. } => ElementKind::ApplyPlugin,
            PipelineElement::Quotes => ElementKind::Quotes,
            PipelineElement::OptionalQuotes => ElementKind::OptionalQuotes,
            PipelineElement::EmailLink => ElementKind::EmailLink,
            PipelineElement::EncodeWhitespace => ElementKind::EncodeWhitespace,
            PipelineElement::BackToForwardSlashes => ElementKind::BackToForwardSlashes,
            PipelineElement::ForwardToBackslashes => ElementKind::ForwardToBackslashes,
            PipelineElement::RemoveExtension => ElementKind::RemoveExtension,
            PipelineElement::AppendSuffix { .. } => ElementKind::AppendSuffix,
            PipelineElement::Uppercase => ElementKind::Uppercase,
            PipelineElement::Lowercase => ElementKind::Lowercase,
            PipelineElement::Trim => ElementKind::Trim,
            PipelineElement::FindReplace { .. } => ElementKind::FindReplace,
            PipelineElement::Regex { .. } => ElementKind::Regex,
        }
    }

    /// Encode this element as a single token.
    pub fn encode(&self) -> String {
        let tag = self.kind().tag();
        match self {
            PipelineElement::ApplyPlugin { plugin_id } => {
                join_token(tag, &[plugin_id])
            }
            PipelineElement::AppendSuffix { suffix } => join_token(tag, &[suffix]),
            PipelineElement::FindReplace { find, replace } => {
                join_token(tag, &[find, replace])
            }
            PipelineElement::Regex {
                pattern,
                replacement,
                ignore_case,
            } => {
                let flag = if *ignore_case { "1" } else { "0" }.to_string();
                join_token(tag, &[pattern, replacement, &flag])
            }
            _ => tag.to_string(),
        }
    }

    /// Decode a single token. Fails with `MalformedToken` for an unknown
    /// tag and `InvalidParameter` for a known tag with bad parameters.
    pub fn decode(token: &str) -> std::result::Result<Self, DecodeError> {
        let fields = split_escaped(token, PARAM_DELIMITER);
        let tag = fields[0].as_str();
        let kind = ElementKind::from_tag(tag)
            .ok_or_else(|| DecodeError::MalformedToken(unescape(token)))?;
        let params: Vec<String> = fields[1..].iter().map(|f| unescape(f)).collect();

        match kind {
            ElementKind::ApplyPlugin => {
                let plugin_id = require_params::<1>(kind, &params)?[0].clone();
                if plugin_id.trim().is_empty() || plugin_id.contains(char::is_whitespace) {
                    return Err(DecodeError::InvalidParameter {
                        tag: kind.tag(),
                        problem: "plugin id must be a non-empty identifier".to_string(),
                    });
                }
                Ok(PipelineElement::ApplyPlugin { plugin_id })
            }
            ElementKind::AppendSuffix => {
                let suffix = require_params::<1>(kind, &params)?[0].clone();
                Ok(PipelineElement::AppendSuffix { suffix })
            }
            ElementKind::FindReplace => {
                let [find, replace] = require_params::<2>(kind, &params)?;
                Ok(PipelineElement::FindReplace {
                    find: find.clone(),
                    replace: replace.clone(),
                })
            }
            ElementKind::Regex => {
                let [pattern, replacement, flag] = require_params::<3>(kind, &params)?;
                let ignore_case = match flag.as_str() {
                    "1" => true,
                    "0" => false,
                    other => {
                        return Err(DecodeError::InvalidParameter {
                            tag: kind.tag(),
                            problem: format!("ignore-case flag must be 0 or 1, found '{}'", other),
                        })
                    }
                };
                if let Err(e) = regex::Regex::new(pattern) {
                    return Err(DecodeError::InvalidParameter {
                        tag: kind.tag(),
                        problem: format!("invalid pattern: {}", e),
                    });
                }
                Ok(PipelineElement::Regex {
                    pattern: pattern.clone(),
                    replacement: replacement.clone(),
                    ignore_case,
                })
            }
            _ => {
                require_params::<0>(kind, &params)?;
                match kind {
                    ElementKind::Quotes => Ok(PipelineElement::Quotes),
                    ElementKind::OptionalQuotes => Ok(PipelineElement::OptionalQuotes),
                    ElementKind::EmailLink => Ok(PipelineElement::EmailLink),
                    ElementKind::EncodeWhitespace => Ok(PipelineElement::EncodeWhitespace),
                    ElementKind::BackToForwardSlashes => {
                        Ok(PipelineElement::BackToForwardSlashes)
                    }
                    ElementKind::ForwardToBackslashes => {
                        Ok(PipelineElement::ForwardToBackslashes)
                    }
                    ElementKind::RemoveExtension => Ok(PipelineElement::RemoveExtension),
                    ElementKind::Uppercase => Ok(PipelineElement::Uppercase),
                    ElementKind::Lowercase => Ok(PipelineElement::Lowercase),
                    ElementKind::Trim => Ok(PipelineElement::Trim),
                    _ => Err(DecodeError::MalformedToken(unescape(token))),
                }
            }
        }
    }

    /// Apply this element to a path. Pure and total: a transformation that
    /// does not apply to the given input returns it unchanged. `ApplyPlugin`
    /// is delegated by the executor and is a no-op here.
    pub fn apply(&self, path: &str) -> String {
        match self {
            PipelineElement::ApplyPlugin { .. } => path.to_string(),
            PipelineElement::Quotes => format!("\"{}\"", path),
            PipelineElement::OptionalQuotes => {
                if path.contains(char::is_whitespace) {
                    format!("\"{}\"", path)
                } else {
                    path.to_string()
                }
            }
            PipelineElement::EmailLink => format!("<{}>", path),
            PipelineElement::EncodeWhitespace => path.replace(' ', "%20"),
            PipelineElement::BackToForwardSlashes => path.replace('\\', "/"),
            PipelineElement::ForwardToBackslashes => path.replace('/', "\\"),
            PipelineElement::RemoveExtension => strip_extension(path),
            PipelineElement::AppendSuffix { suffix } => format!("{}{}", path, suffix),
            PipelineElement::Uppercase => path.to_uppercase(),
            PipelineElement::Lowercase => path.to_lowercase(),
            PipelineElement::Trim => path.trim().to_string(),
            PipelineElement::FindReplace { find, replace } => {
                if find.is_empty() {
                    path.to_string()
                } else {
                    path.replace(find.as_str(), replace)
                }
            }
            PipelineElement::Regex {
                pattern,
                replacement,
                ignore_case,
            } => match regex::RegexBuilder::new(pattern)
                .case_insensitive(*ignore_case)
                .build()
            {
                Ok(re) => re.replace_all(path, replacement.as_str()).into_owned(),
                Err(_) => path.to_string(),
            },
        }
    }
}

fn join_token(tag: &str, params: &[&String]) -> String {
    let mut token = tag.to_string();
    for param in params {
        token.push(PARAM_DELIMITER);
        token.push_str(&escape_param(param));
    }
    token
}

fn require_params<const N: usize>(
    kind: ElementKind,
    params: &[String],
) -> std::result::Result<&[String; N], DecodeError> {
    params
        .try_into()
        .map_err(|_| DecodeError::InvalidParameter {
            tag: kind.tag(),
            problem: format!("expected {} parameter(s), found {}", N, params.len()),
        })
}

/// Remove the extension of the final path component. Directories and
/// dot-files (a leading dot with no other dot) are left untouched.
fn strip_extension(path: &str) -> String {
    let name_start = path.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(0) | None => path.to_string(),
        Some(dot) => path[..name_start + dot].to_string(),
    }
}

/// Escape the token delimiters and the escape character itself.
pub(crate) fn escape_param(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == ESCAPE || c == ELEMENT_DELIMITER || c == PARAM_DELIMITER {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Split on an unescaped delimiter, preserving escape sequences in the
/// returned fields so a second-level split still sees them.
pub(crate) fn split_escaped(input: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            current.push(c);
            if let Some(next) = chars.next() {
                current.push(next);
            }
        } else if c == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);
    fields
}

/// Drop escape characters, keeping the characters they protected.
pub(crate) fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip_for_every_variant() {
        let elements = vec![
            PipelineElement::ApplyPlugin {
                plugin_id: "long-path".to_string(),
            },
            PipelineElement::Quotes,
            PipelineElement::OptionalQuotes,
            PipelineElement::EmailLink,
            PipelineElement::EncodeWhitespace,
            PipelineElement::BackToForwardSlashes,
            PipelineElement::ForwardToBackslashes,
            PipelineElement::RemoveExtension,
            PipelineElement::AppendSuffix {
                suffix: ".bak".to_string(),
            },
            PipelineElement::Uppercase,
            PipelineElement::Lowercase,
            PipelineElement::Trim,
            PipelineElement::FindReplace {
                find: "a;b".to_string(),
                replace: "c,d".to_string(),
            },
            PipelineElement::Regex {
                pattern: r"\d+".to_string(),
                replacement: "N".to_string(),
                ignore_case: true,
            },
        ];

        for element in elements {
            let token = element.encode();
            assert_eq!(PipelineElement::decode(&token), Ok(element.clone()));
        }
    }

    #[test]
    fn decode_rejects_unknown_tag() {
        assert_eq!(
            PipelineElement::decode("frobnicate"),
            Err(DecodeError::MalformedToken("frobnicate".to_string()))
        );
    }

    #[test]
    fn decode_rejects_empty_plugin_id() {
        let err = PipelineElement::decode("apply,").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidParameter { tag: "apply", .. }));
    }

    #[test]
    fn decode_rejects_wrong_arity() {
        let err = PipelineElement::decode("quotes,stray").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidParameter { tag: "quotes", .. }));

        let err = PipelineElement::decode("replace,only-one").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidParameter { tag: "replace", .. }));
    }

    #[test]
    fn decode_rejects_invalid_regex_pattern() {
        let err = PipelineElement::decode("regex,[unclosed,x,0").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidParameter { tag: "regex", .. }));
    }

    #[test]
    fn decode_rejects_bad_ignore_case_flag() {
        let err = PipelineElement::decode("regex,a,b,yes").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidParameter { tag: "regex", .. }));
    }

    #[test]
    fn apply_is_total_over_odd_inputs() {
        assert_eq!(PipelineElement::RemoveExtension.apply(""), "");
        assert_eq!(PipelineElement::RemoveExtension.apply(".gitignore"), ".gitignore");
        assert_eq!(PipelineElement::RemoveExtension.apply("/a/b.tar.gz"), "/a/b.tar");
        assert_eq!(PipelineElement::Trim.apply("  x \t"), "x");
        assert_eq!(
            PipelineElement::FindReplace {
                find: String::new(),
                replace: "x".to_string()
            }
            .apply("path"),
            "path"
        );
    }

    #[test]
    fn apply_plugin_is_a_no_op_without_the_executor() {
        let element = PipelineElement::ApplyPlugin {
            plugin_id: "long-path".to_string(),
        };
        assert_eq!(element.apply("C:\\a"), "C:\\a");
    }

    #[test]
    fn quotes_and_links_wrap_the_path() {
        assert_eq!(PipelineElement::Quotes.apply("a b"), "\"a b\"");
        assert_eq!(PipelineElement::OptionalQuotes.apply("ab"), "ab");
        assert_eq!(PipelineElement::OptionalQuotes.apply("a b"), "\"a b\"");
        assert_eq!(PipelineElement::EmailLink.apply("/a/b"), "</a/b>");
        assert_eq!(PipelineElement::EncodeWhitespace.apply("a b c"), "a%20b%20c");
    }

    #[test]
    fn slash_conversions() {
        assert_eq!(
            PipelineElement::BackToForwardSlashes.apply("C:\\a\\b"),
            "C:/a/b"
        );
        assert_eq!(PipelineElement::ForwardToBackslashes.apply("/a/b"), "\\a\\b");
    }

    #[test]
    fn regex_apply_with_case_insensitivity() {
        let element = PipelineElement::Regex {
            pattern: "^c:".to_string(),
            replacement: "D:".to_string(),
            ignore_case: true,
        };
        assert_eq!(element.apply("C:\\tmp"), "D:\\tmp");
    }

    #[test]
    fn escaping_survives_both_split_levels() {
        let element = PipelineElement::FindReplace {
            find: "a\\b;c".to_string(),
            replace: ",".to_string(),
        };
        let token = element.encode();
        let fields = split_escaped(&token, ELEMENT_DELIMITER);
        assert_eq!(fields.len(), 1);
        assert_eq!(PipelineElement::decode(&fields[0]), Ok(element));
    }
}
