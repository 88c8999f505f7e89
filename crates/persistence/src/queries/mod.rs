// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `exams`: exam lookups, duplicate-name and overlap candidates
//! - `references`: reference existence and display-name resolution

pub mod exams;
pub mod references;
