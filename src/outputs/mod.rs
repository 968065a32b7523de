pub mod console;
pub mod markup;
pub mod memory;
pub mod sink;

pub use console::ConsoleSink;
pub use markup::HtmlSink;
pub use memory::MemorySink;
pub use sink::ResultSink;
