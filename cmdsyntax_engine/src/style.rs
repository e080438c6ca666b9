use thiserror::Error;

use crate::constant::*;

/// The lexical conventions used to write syntax definitions and command lines.
///
/// A style is validated once (see [`StyleConfig::validate`]) and is read-only afterwards.
/// The [`Default`] style uses `()` for groups, `[]` for optional items, `{}` for selections, `<>` for extended labels,
/// `"..."` for literal commands, a space as the AND operator, `|` as the OR operator and `-`/`--` switches.
///
/// ### Example
/// ```
/// # use cmdsyntax_engine as cmdsyntax;
/// use cmdsyntax::StyleConfig;
///
/// let style = StyleConfig::default()
///     .allow_single_long(true)
///     .expand_single(false);
/// assert!(style.validate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleConfig {
    pub(crate) group: (char, char),
    pub(crate) optional: (char, char),
    pub(crate) selection: (char, char),
    pub(crate) extended: (char, char),
    pub(crate) command: (char, char),
    pub(crate) and_operator: char,
    pub(crate) or_operator: char,
    pub(crate) switch: char,
    pub(crate) allow_double: bool,
    pub(crate) allow_double_value: bool,
    pub(crate) allow_single_value: bool,
    pub(crate) allow_single_long: bool,
    pub(crate) expand_single: bool,
    pub(crate) allow_separate_value: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            group: (GROUP_START, GROUP_END),
            optional: (OPTIONAL_START, OPTIONAL_END),
            selection: (SELECTION_START, SELECTION_END),
            extended: (EXTENDED_START, EXTENDED_END),
            command: (COMMAND_START, COMMAND_END),
            and_operator: AND_OPERATOR,
            or_operator: OR_OPERATOR,
            switch: SWITCH_PREFIX,
            allow_double: true,
            allow_double_value: true,
            allow_single_value: false,
            allow_single_long: false,
            expand_single: true,
            allow_separate_value: false,
        }
    }
}

impl StyleConfig {
    /// Set the delimiters of a group, `(a b)` by default.
    pub fn with_group(mut self, start: char, end: char) -> Self {
        self.group = (start, end);
        self
    }

    /// Set the delimiters of an optional block, `[a b]` by default.
    pub fn with_optional(mut self, start: char, end: char) -> Self {
        self.optional = (start, end);
        self
    }

    /// Set the delimiters of a selection block, `{a b}` by default.
    pub fn with_selection(mut self, start: char, end: char) -> Self {
        self.selection = (start, end);
        self
    }

    /// Set the delimiters of an extended label, `<my label>` by default.
    pub fn with_extended(mut self, start: char, end: char) -> Self {
        self.extended = (start, end);
        self
    }

    /// Set the delimiters of a literal command, `"add"` by default.
    pub fn with_command(mut self, start: char, end: char) -> Self {
        self.command = (start, end);
        self
    }

    /// Set the AND (sequence) and OR (exclusive choice) operators.
    pub fn with_operators(mut self, and_operator: char, or_operator: char) -> Self {
        self.and_operator = and_operator;
        self.or_operator = or_operator;
        self
    }

    /// Set the switch prefix character.
    pub fn with_switch(mut self, prefix: char) -> Self {
        self.switch = prefix;
        self
    }

    /// Allow `--name` switches.
    pub fn allow_double(mut self, allow: bool) -> Self {
        self.allow_double = allow;
        self
    }

    /// Allow `--name=value` switches.
    pub fn allow_double_value(mut self, allow: bool) -> Self {
        self.allow_double_value = allow;
        self
    }

    /// Allow `-n=value` switches.
    pub fn allow_single_value(mut self, allow: bool) -> Self {
        self.allow_single_value = allow;
        self
    }

    /// Allow `-name` switches.
    pub fn allow_single_long(mut self, allow: bool) -> Self {
        self.allow_single_long = allow;
        self
    }

    /// Expand `-abc` into `-a -b -c`.
    pub fn expand_single(mut self, expand: bool) -> Self {
        self.expand_single = expand;
        self
    }

    /// Allow a value-taking switch to take its value from the following token (`--name value`).
    pub fn allow_separate_value(mut self, allow: bool) -> Self {
        self.allow_separate_value = allow;
        self
    }

    /// Check this style for contradictions.
    ///
    /// A style is inconsistent when:
    /// * The AND and OR operators are identical, or both whitespace.
    /// * Both `allow_single_long` and `expand_single` are enabled.
    /// * An operator or the switch prefix is also a delimiter, or two bracket kinds share a character.
    pub fn validate(&self) -> bool {
        if self.and_operator == self.or_operator {
            return false;
        }

        if self.and_operator.is_whitespace() && self.or_operator.is_whitespace() {
            return false;
        }

        if self.allow_single_long && self.expand_single {
            return false;
        }

        if self.switch.is_whitespace()
            || self.switch == self.and_operator
            || self.switch == self.or_operator
            || self.switch == VALUE_SEPARATOR
        {
            return false;
        }

        let brackets = [
            self.group.0,
            self.group.1,
            self.optional.0,
            self.optional.1,
            self.selection.0,
            self.selection.1,
            self.extended.0,
            self.extended.1,
        ];

        for (i, c) in brackets.iter().enumerate() {
            if brackets[i + 1..].contains(c) || *c == self.command.0 || *c == self.command.1 {
                return false;
            }
        }

        let delimiters = self.delimiters();

        !delimiters
            .iter()
            .any(|d| {
                d.is_whitespace()
                    || *d == self.and_operator
                    || *d == self.or_operator
                    || *d == self.switch
            })
    }

    fn delimiters(&self) -> [char; 10] {
        [
            self.group.0,
            self.group.1,
            self.optional.0,
            self.optional.1,
            self.selection.0,
            self.selection.1,
            self.extended.0,
            self.extended.1,
            self.command.0,
            self.command.1,
        ]
    }

    /// Characters which end a plain label in a syntax definition.
    pub(crate) fn is_special(&self, c: char) -> bool {
        self.delimiters().contains(&c)
            || c == self.switch
            || c == self.and_operator
            || c == self.or_operator
    }

    pub(crate) fn is_closing(&self, c: char) -> bool {
        c == self.group.1 || c == self.optional.1 || c == self.selection.1
    }

    pub(crate) fn is_switch(&self, text: &str) -> bool {
        text.starts_with(self.switch)
    }

    /// Reduce a styled switch (ex: `--output=dir`) to its canonical name and value.
    ///
    /// A trailing `=` is only accepted from the command line, where it denotes an empty value.
    ///
    /// ### Example
    /// ```
    /// # use cmdsyntax_engine as cmdsyntax;
    /// use cmdsyntax::{Origin, StyleConfig};
    ///
    /// let style = StyleConfig::default();
    /// let switch = style.unstyle_switch("--output=dir", Origin::Definition).unwrap();
    /// assert_eq!(switch.name(), "output");
    /// assert_eq!(switch.value(), Some("dir"));
    /// ```
    pub fn unstyle_switch(&self, text: &str, origin: Origin) -> Result<StyledSwitch, SwitchError> {
        let leading = text.chars().take_while(|c| *c == self.switch).count();
        let equals = text.matches(VALUE_SEPARATOR).count();
        let s = self.switch;

        match leading {
            0 => return Err(SwitchError::NotASwitch(text.to_string())),
            1 => {
                if equals > 0 {
                    if !self.allow_single_value {
                        return Err(SwitchError::ForbiddenForm {
                            form: format!("{s}x=value"),
                            text: text.to_string(),
                        });
                    }

                    let separator = text.chars().position(|c| c == VALUE_SEPARATOR);

                    if separator.map_or(false, |p| p > 2) && !self.allow_single_long {
                        return Err(SwitchError::ForbiddenForm {
                            form: format!("{s}name=value"),
                            text: text.to_string(),
                        });
                    }
                } else if text.chars().count() > 2
                    && !self.expand_single
                    && !self.allow_single_long
                {
                    return Err(SwitchError::ForbiddenForm {
                        form: format!("{s}abc"),
                        text: text.to_string(),
                    });
                }
            }
            2 => {
                if !self.allow_double {
                    return Err(SwitchError::ForbiddenForm {
                        form: format!("{s}{s}name"),
                        text: text.to_string(),
                    });
                }

                if equals > 0 && !self.allow_double_value {
                    return Err(SwitchError::ForbiddenForm {
                        form: format!("{s}{s}name=value"),
                        text: text.to_string(),
                    });
                }
            }
            _ => {
                return Err(SwitchError::ForbiddenForm {
                    form: format!("{s}{s}{s}name"),
                    text: text.to_string(),
                });
            }
        }

        if equals > 1 {
            return Err(SwitchError::TooManyEquals(text.to_string()));
        }

        if origin == Origin::Definition && text.ends_with(VALUE_SEPARATOR) {
            return Err(SwitchError::TrailingEquals(text.to_string()));
        }

        // The prefix characters are all the same, so the byte offset is a multiple of their width.
        let body = &text[leading * s.len_utf8()..];

        if body.starts_with(VALUE_SEPARATOR) {
            return Err(SwitchError::LeadingEquals(text.to_string()));
        }

        let (name, value) = match body.split_once(VALUE_SEPARATOR) {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (body, None),
        };

        if name.is_empty() {
            return Err(SwitchError::MissingName(text.to_string()));
        }

        Ok(StyledSwitch {
            leading,
            name: name.to_string(),
            value,
        })
    }

    /// Whether a definition switch such as `-abc` stands for the set `-a -b -c`.
    pub(crate) fn expands(&self, switch: &StyledSwitch) -> bool {
        self.expand_single
            && switch.leading == 1
            && switch.value.is_none()
            && switch.name.chars().count() > 1
    }
}

/// Where the text handed to [`StyleConfig::unstyle_switch`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A switch written in a syntax definition.
    Definition,
    /// A switch supplied on the command line.
    CommandLine,
}

/// A switch with its style information removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSwitch {
    leading: usize,
    name: String,
    value: Option<String>,
}

impl StyledSwitch {
    /// The number of prefix characters (ex: `2` for `--name`).
    pub fn leading(&self) -> usize {
        self.leading
    }

    /// The switch name, without prefix or value.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The text after the `=`, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// A switch which does not fit the style.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwitchError {
    /// The style does not allow this form of switch.
    #[error("Forbidden form of switch ({form}): {text}")]
    ForbiddenForm {
        /// The forbidden form, ex: `-x=value`.
        form: String,
        /// The offending switch.
        text: String,
    },

    /// More than one `=` in a switch.
    #[error("Too many equals signs in switch: {0}")]
    TooManyEquals(String),

    /// A definition switch ending with `=`.
    #[error("Trailing equals sign in switch: {0}")]
    TrailingEquals(String),

    /// A switch whose name starts with `=`.
    #[error("Leading equals sign in switch: {0}")]
    LeadingEquals(String),

    /// A switch prefix without a name.
    #[error("Missing name in switch: {0}")]
    MissingName(String),

    /// The text does not start with the switch prefix.
    #[error("Not a switch: {0}")]
    NotASwitch(String),
}
