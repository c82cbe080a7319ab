//! 编译模块：将声明式签名编译为可执行的匹配器
pub mod pattern;
pub mod compiler;

pub use self::pattern::{CompiledSignature, Matcher, ScriptPattern, SignatureCatalog};
pub use self::compiler::CatalogCompiler;
