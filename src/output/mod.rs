// SPDX-License-Identifier: GPL-3.0-only

//! Output actions on the final image
//!
//! - [`share`]: hand the image to a [`ShareSurface`], saving it with a hint
//!   when the platform cannot share
//! - [`print`]: open a printable A4 page embedding the image

pub mod print;
pub mod share;

pub use print::{print, render_print_document, write_print_document};
pub use share::{DesktopShare, ShareOutcome, ShareRequest, ShareSurface, share};
