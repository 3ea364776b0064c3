//! Wire formats of SBE chip-op responses.
//!
//! A response buffer carries the returned value, a magic-tagged status
//! header, an optional region of FFDC packages and a trailing word giving
//! the header distance from the end of the buffer. [`frame`] decodes the
//! outer framing, [`ffdc`] the packages inside the FFDC region and
//! [`writer`] produces buffers in the same layout.

pub mod ffdc;
pub mod frame;
pub mod severity;
pub mod writer;

pub use ffdc::{FfdcError, FfdcMap, FfdcPackage, parse_ffdc_packages, parse_response_with_ffdc};
pub use frame::{FrameError, PrimaryStatus, ResponseFrame, SecondaryStatus, parse_response};
pub use severity::Severity;

/// All framing fields are 32-bit big-endian words.
pub const WORD_SIZE: usize = 4;
