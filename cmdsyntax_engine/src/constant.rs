pub(crate) const GROUP_START: char = '(';
pub(crate) const GROUP_END: char = ')';
pub(crate) const OPTIONAL_START: char = '[';
pub(crate) const OPTIONAL_END: char = ']';
pub(crate) const SELECTION_START: char = '{';
pub(crate) const SELECTION_END: char = '}';
pub(crate) const EXTENDED_START: char = '<';
pub(crate) const EXTENDED_END: char = '>';
pub(crate) const COMMAND_START: char = '"';
pub(crate) const COMMAND_END: char = '"';
pub(crate) const AND_OPERATOR: char = ' ';
pub(crate) const OR_OPERATOR: char = '|';
pub(crate) const SWITCH_PREFIX: char = '-';
pub(crate) const VALUE_SEPARATOR: char = '=';
pub(crate) const QUOTE: char = '"';
