/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Unit tests for the value transformation passes of `style_values`.

#[cfg(test)]
mod lexer;

#[cfg(test)]
mod calc;
#[cfg(test)]
mod colors;
#[cfg(test)]
mod shorthands;
#[cfg(test)]
mod values;
