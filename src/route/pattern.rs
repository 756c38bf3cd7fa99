use std::{collections::HashSet, fmt, sync::Arc};

use crate::error::RouteError;

/// One piece of a path template.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Segment {
    /// Matches exactly this text.
    Literal(String),
    /// `{name}`: matches any single segment.
    Param(Arc<str>),
    /// `{name...}`: matches one or more trailing segments.
    CatchAll(Arc<str>),
}

/// A parsed path template such as `/projects/{id}/files/{path...}`.
#[derive(Clone, Eq, PartialEq)]
pub struct Pattern {
    template: Arc<str>,
    segments: Vec<Segment>,
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.template).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

fn parse_segment(template: &str, piece: &str) -> Result<Segment, RouteError> {
    let inner = match piece.strip_prefix('{') {
        Some(inner) => inner,
        None => return Ok(Segment::Literal(piece.to_string())),
    };
    let inner = inner
        .strip_suffix('}')
        .ok_or_else(|| RouteError::UnterminatedParam {
            template: template.to_string(),
            segment: piece.to_string(),
        })?;

    let (name, catch_all) = match inner.strip_suffix("...") {
        Some(name) => (name, true),
        None => (inner, false),
    };
    if name.is_empty() {
        return Err(RouteError::EmptyParamName {
            template: template.to_string(),
        });
    }

    Ok(if catch_all {
        Segment::CatchAll(name.into())
    } else {
        Segment::Param(name.into())
    })
}

impl Pattern {
    /// Parse a path template.
    ///
    /// Leading, trailing and repeated `/` are ignored, so `/users/{id}/` and
    /// `users//{id}` describe the same pattern.
    pub fn parse(template: &str) -> Result<Self, RouteError> {
        let segments = template
            .split('/')
            .filter(|piece| !piece.is_empty())
            .map(|piece| parse_segment(template, piece))
            .collect::<Result<Vec<_>, _>>()?;

        let catch_alls = segments
            .iter()
            .filter(|segment| matches!(segment, Segment::CatchAll(_)))
            .count();
        if catch_alls > 1 {
            return Err(RouteError::MultipleCatchAll {
                template: template.to_string(),
            });
        }
        if let Some(pos) = segments
            .iter()
            .position(|segment| matches!(segment, Segment::CatchAll(_)))
        {
            if pos + 1 != segments.len() {
                if let Segment::CatchAll(name) = &segments[pos] {
                    return Err(RouteError::CatchAllNotLast {
                        template: template.to_string(),
                        name: name.to_string(),
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        for segment in &segments {
            if let Segment::Param(name) | Segment::CatchAll(name) = segment {
                if !seen.insert(name.clone()) {
                    return Err(RouteError::DuplicateParam {
                        template: template.to_string(),
                        name: name.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            template: template.into(),
            segments,
        })
    }

    /// The template this pattern was parsed from.
    #[inline]
    pub fn template(&self) -> &str {
        &self.template
    }

    pub(crate) fn shared_template(&self) -> Arc<str> {
        self.template.clone()
    }

    /// The parsed segments, in path order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of [`Segment::Literal`] segments.
    ///
    /// Routes with more literals are inserted into the trie first.
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Literal(_)))
            .count()
    }

    /// Parameter names, in path order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) | Segment::CatchAll(name) => Some(&**name),
            Segment::Literal(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.to_string())
    }

    fn param(s: &str) -> Segment {
        Segment::Param(s.into())
    }

    #[test]
    fn classify_segments() {
        let pattern = Pattern::parse("/projects/{project_id}/files/{path...}").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                lit("projects"),
                param("project_id"),
                lit("files"),
                Segment::CatchAll("path".into()),
            ]
        );
        assert_eq!(pattern.literal_count(), 2);
        assert_eq!(
            pattern.param_names().collect::<Vec<_>>(),
            vec!["project_id", "path"]
        );
    }

    #[test]
    fn slashes_are_trimmed() {
        assert_eq!(
            Pattern::parse("/users/{id}/").unwrap().segments(),
            Pattern::parse("users//{id}").unwrap().segments()
        );
        assert!(Pattern::parse("/").unwrap().segments().is_empty());
        assert!(Pattern::parse("").unwrap().segments().is_empty());
    }

    #[test]
    fn literal_with_brace_inside() {
        let pattern = Pattern::parse("/a}b").unwrap();
        assert_eq!(pattern.segments(), &[lit("a}b")]);
    }

    #[test]
    fn rejects_malformed_templates() {
        assert!(matches!(
            Pattern::parse("/users/{id"),
            Err(RouteError::UnterminatedParam { .. })
        ));
        assert!(matches!(
            Pattern::parse("/users/{}"),
            Err(RouteError::EmptyParamName { .. })
        ));
        assert!(matches!(
            Pattern::parse("/files/{...}"),
            Err(RouteError::EmptyParamName { .. })
        ));
        assert_eq!(
            Pattern::parse("/files/{path...}/raw"),
            Err(RouteError::CatchAllNotLast {
                template: "/files/{path...}/raw".to_string(),
                name: "path".to_string(),
            })
        );
        assert!(matches!(
            Pattern::parse("/{a...}/{b...}"),
            Err(RouteError::MultipleCatchAll { .. })
        ));
        assert!(matches!(
            Pattern::parse("/{id}/x/{id}"),
            Err(RouteError::DuplicateParam { .. })
        ));
    }

    #[test]
    fn error_messages() {
        let err = Pattern::parse("/drive/{path...}/x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "catch-all parameter `path` must be the last segment of `/drive/{path...}/x`"
        );
    }
}
