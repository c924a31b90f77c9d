use regex::{Captures, Regex};

use super::{MarkupError, placeholders::Placeholder};

/// Lazy, one-or-more wildcard each placeholder compiles to.
const WILDCARD: &str = "(.+?)";

/// Where a compiled pattern is allowed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternAnchor {
    /// Anywhere in the haystack, repeatedly.
    Anywhere,
    /// Only a match that ends the haystack.
    End,
}

/// 1-based capture group index of each placeholder in a compiled template.
///
/// `id` and `display` always resolve: when a template lacks one of them it
/// aliases the other's group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPositions {
    pub id: usize,
    pub display: usize,
    pub kind: Option<usize>,
}

/// Compiles a markup template into a regex.
///
/// The template is escaped literally and each placeholder is replaced by a
/// lazy capture group. The pattern is not anchored at the start.
pub fn compile_pattern(template: &str, anchor: PatternAnchor) -> Result<Regex, MarkupError> {
    let mut pattern = regex::escape(template);
    for placeholder in Placeholder::REPLACEMENT_ORDER {
        pattern = pattern.replacen(placeholder.token(), WILDCARD, 1);
    }
    if anchor == PatternAnchor::End {
        pattern.push('$');
    }
    Ok(Regex::new(&pattern)?)
}

/// Ranks the placeholders of `template` by where they occur to find their
/// capture group numbers.
pub fn group_positions(template: &str) -> Result<GroupPositions, MarkupError> {
    let mut found: Vec<(usize, Placeholder)> =
        [Placeholder::Id, Placeholder::Display, Placeholder::Kind]
            .into_iter()
            .filter_map(|p| template.find(p.token()).map(|index| (index, p)))
            .collect();
    found.sort_by_key(|(index, _)| *index);

    let rank = |placeholder: Placeholder| {
        found
            .iter()
            .position(|(_, p)| *p == placeholder)
            .map(|position| position + 1)
    };

    let (id, display) = match (rank(Placeholder::Id), rank(Placeholder::Display)) {
        (Some(id), Some(display)) => (id, display),
        (Some(id), None) => (id, id),
        (None, Some(display)) => (display, display),
        (None, None) => {
            return Err(MarkupError::MissingPlaceholders {
                template: template.to_string(),
            });
        }
    };

    Ok(GroupPositions {
        id,
        display,
        kind: rank(Placeholder::Kind),
    })
}

/// Fills the placeholders of `template` with literal values.
///
/// Placeholders the template does not use are simply ignored.
pub fn build_mention_markup(template: &str, id: &str, display: &str, kind: &str) -> String {
    template
        .replacen(Placeholder::ID, id, 1)
        .replacen(Placeholder::DISPLAY, display, 1)
        .replacen(Placeholder::KIND, kind, 1)
}

/// The fields captured from one mention token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionFields<'h> {
    pub id: &'h str,
    pub display: &'h str,
    pub kind: Option<&'h str>,
}

/// A compiled markup template: the scanning pattern plus the group layout.
#[derive(Debug, Clone)]
pub struct Grammar {
    template: String,
    pattern: Regex,
    end_pattern: Regex,
    groups: GroupPositions,
}

impl Grammar {
    /// Compiles `template` without going through a registry.
    pub fn compile(template: &str) -> Result<Self, MarkupError> {
        let groups = group_positions(template)?;
        Ok(Self {
            template: template.to_string(),
            pattern: compile_pattern(template, PatternAnchor::Anywhere)?,
            end_pattern: compile_pattern(template, PatternAnchor::End)?,
            groups,
        })
    }

    /// Uses a caller-supplied pattern for scanning instead of the one
    /// derived from `template`.
    ///
    /// The pattern must keep the placeholder capture groups in template order.
    pub fn with_pattern(template: &str, pattern: Regex) -> Result<Self, MarkupError> {
        let groups = group_positions(template)?;
        Ok(Self {
            template: template.to_string(),
            pattern,
            end_pattern: compile_pattern(template, PatternAnchor::End)?,
            groups,
        })
    }

    pub(crate) fn from_parts(
        template: &str,
        pattern: Regex,
        end_pattern: Regex,
        groups: GroupPositions,
    ) -> Self {
        Self {
            template: template.to_string(),
            pattern,
            end_pattern,
            groups,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn groups(&self) -> GroupPositions {
        self.groups
    }

    /// Builds the markup for a single mention with this template.
    pub fn build_mention(&self, id: &str, display: &str, kind: &str) -> String {
        build_mention_markup(&self.template, id, display, kind)
    }

    /// Parses `markup` as exactly one mention token.
    ///
    /// Returns `None` when `markup` has anything before or after the token.
    pub fn parse_mention<'h>(&self, markup: &'h str) -> Option<MentionFields<'h>> {
        let caps = self.end_pattern.captures(markup)?;
        if caps.get(0)?.start() != 0 {
            return None;
        }
        Some(self.fields(&caps))
    }

    pub(crate) fn fields<'h>(&self, caps: &Captures<'h>) -> MentionFields<'h> {
        let group = |index: usize| caps.get(index).map_or("", |m| m.as_str());
        MentionFields {
            id: group(self.groups.id),
            display: group(self.groups.display),
            kind: self.groups.kind.map(group),
        }
    }
}
