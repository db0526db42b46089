/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Value-shape rewrites that apply within a single declaration.

pub mod box_shadow;
pub mod calc;
pub mod font;
pub mod gradient;
pub mod transform;
