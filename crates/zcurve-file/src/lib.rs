//! ZCurve 文件处理
//!
//! 支持：
//! - JSON 运行输入（覆盖记录 + 参数 + 配置）读取
//! - JSON 运行结果（元素 + 放置请求 + 跳过的放置）写出

pub mod error;
pub mod input;
pub mod output;

pub use error::FileError;
pub use input::{load_input, parse_input};
pub use output::{save_output, write_output, OutputDocument};
