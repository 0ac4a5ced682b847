//! Domain layer: syntax tree, notation reader and the two projections
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod diagram;
pub mod ebnf;
pub mod error;
pub mod node;
pub mod reader;
pub mod rule;
pub mod tree;

pub use diagram::{to_diagram, to_diagram_with_anchor, DiagramNode};
pub use ebnf::{render_rule, to_text};
pub use error::{DomainError, DomainResult, Location, SyntaxError, SyntaxErrorKind};
pub use node::{Node, Terminal, TerminalClass};
pub use reader::{parse, MAX_NESTING};
pub use rule::{CompiledRule, RuleDocument, RuleRecord};
pub use tree::ToTermTree;
