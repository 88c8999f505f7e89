// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Multi-statement writes run in a Diesel transaction, which becomes a
//! savepoint when the caller already holds an immediate transaction.

pub mod exams;
pub mod references;
