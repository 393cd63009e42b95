mod classifier;
mod prompt;
mod simulate;

pub(crate) use prompt::build_user_prompt;
pub(crate) use simulate::simulate;
