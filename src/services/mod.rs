pub(crate) mod collecting;
pub(crate) mod dispatch;
pub(crate) mod fetching;
pub(crate) mod report;
pub(crate) mod text_utils;

#[cfg(test)]
pub(crate) mod fakes;
