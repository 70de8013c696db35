pub(crate) mod binary_choice;
pub(crate) mod modal;
pub(crate) mod preview;
pub(crate) mod text;
