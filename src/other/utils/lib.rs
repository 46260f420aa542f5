mod canonicalize_unexistent;
use canonicalize_unexistent::canonicalize_unexistent;

mod init_logging;
pub use init_logging::*;
