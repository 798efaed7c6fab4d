pub mod audio;
pub mod countdown;
pub mod storage;
pub mod ui;
