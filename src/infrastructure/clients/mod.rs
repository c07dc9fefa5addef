pub(crate) mod steam;
pub(crate) mod telegram;
