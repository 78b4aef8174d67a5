mod board;

pub use board::{BoardService, ProjectBoard};

#[cfg(any(test, feature = "test-utils"))]
pub use board::MockBoardService;
