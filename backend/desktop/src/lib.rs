pub mod driver;
pub mod input;
pub mod ocr;
pub mod process;
pub mod screen;
pub mod template;

pub use driver::{DriverConfig, RetaguardaDriver};
pub use input::InputDriver;
pub use ocr::OcrEngine;
pub use process::AppProcess;
pub use template::{Region, Template};
