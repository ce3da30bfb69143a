//! Small social commands plus the help and registration helpers.

pub(crate) mod help;
pub(crate) mod hello;
pub(crate) mod ping;
pub(crate) mod poll;

use crate::{CommandResult, Context};
