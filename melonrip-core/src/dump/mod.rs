pub mod magic;
pub mod opcode;
pub mod parser;
pub mod reader;

pub use magic::{check_magic, magic_for_version, MAGIC_LEN, MAX_VERSION, MIN_VERSION};
pub use opcode::Opcode;
pub use parser::{parse_dump, DumpParser, RegisterState, Rip};
pub use reader::DumpReader;
