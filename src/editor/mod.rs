mod buffer;
mod cursor;
mod editor;
mod output;
mod samples;
mod status;

pub use buffer::Buffer;
pub use cursor::Cursor;
pub use editor::Editor;
pub use output::{OutputKind, OutputLine, OutputView};
pub use status::Status;
