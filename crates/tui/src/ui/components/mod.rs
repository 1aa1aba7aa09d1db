pub mod card;
pub mod charts;
pub mod dialog;
pub mod hints;
pub mod tabs;
pub mod toast;
