/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Declarations, the property table, and the per-rule-body entry point.

use std::fmt::{self, Write};

use crate::color;
use crate::tokens::{minify_whitespace, SourceLocation, ToCss, TokenList};
use crate::values::{box_shadow, calc, font, gradient, transform};
use crate::Settings;

pub mod border_radius;
pub mod box_shorthand;

use border_radius::BorderRadiusTracker;
use box_shorthand::{BoxSideTracker, INSET_SIDES, MARGIN_SIDES, PADDING_SIDES};

macro_rules! property_table {
    ( $( $variant:ident => $name:literal, )+ ) => {
        /// A property this crate knows how to transform values of.
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        #[allow(missing_docs)]
        pub enum Property {
            $( $variant, )+
        }

        impl Property {
            /// Looks a property up by name, ASCII-case-insensitively.
            pub fn from_name(name: &str) -> Option<Self> {
                Some(match &*name.to_ascii_lowercase() {
                    $( $name => Property::$variant, )+
                    _ => return None,
                })
            }

            /// The canonical (lowercase) name of this property.
            pub fn name(self) -> &'static str {
                match self {
                    $( Property::$variant => $name, )+
                }
            }
        }
    };
}

property_table! {
    Margin => "margin",
    MarginTop => "margin-top",
    MarginRight => "margin-right",
    MarginBottom => "margin-bottom",
    MarginLeft => "margin-left",
    Padding => "padding",
    PaddingTop => "padding-top",
    PaddingRight => "padding-right",
    PaddingBottom => "padding-bottom",
    PaddingLeft => "padding-left",
    Inset => "inset",
    Top => "top",
    Right => "right",
    Bottom => "bottom",
    Left => "left",
    BorderRadius => "border-radius",
    BorderTopLeftRadius => "border-top-left-radius",
    BorderTopRightRadius => "border-top-right-radius",
    BorderBottomRightRadius => "border-bottom-right-radius",
    BorderBottomLeftRadius => "border-bottom-left-radius",
    BoxShadow => "box-shadow",
    Transform => "transform",
    FontWeight => "font-weight",
    Font => "font",
    Color => "color",
    BackgroundColor => "background-color",
    BorderColor => "border-color",
    BorderTopColor => "border-top-color",
    BorderRightColor => "border-right-color",
    BorderBottomColor => "border-bottom-color",
    BorderLeftColor => "border-left-color",
    OutlineColor => "outline-color",
    TextDecorationColor => "text-decoration-color",
    CaretColor => "caret-color",
    Fill => "fill",
    Stroke => "stroke",
    Background => "background",
    BackgroundImage => "background-image",
    BorderImageSource => "border-image-source",
    MaskImage => "mask-image",
    ListStyleImage => "list-style-image",
}

impl Property {
    /// Whether values of this property are colors (possibly several).
    fn carries_color(self) -> bool {
        matches!(
            self,
            Property::Color |
                Property::BackgroundColor |
                Property::BorderColor |
                Property::BorderTopColor |
                Property::BorderRightColor |
                Property::BorderBottomColor |
                Property::BorderLeftColor |
                Property::OutlineColor |
                Property::TextDecorationColor |
                Property::CaretColor |
                Property::Fill |
                Property::Stroke
        )
    }

    /// Whether values of this property may contain gradients.
    fn carries_image(self) -> bool {
        matches!(
            self,
            Property::Background |
                Property::BackgroundImage |
                Property::BorderImageSource |
                Property::MaskImage |
                Property::ListStyleImage
        )
    }
}

/// The property of a declaration, known or carried through verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PropertyKey {
    /// A property from the [`Property`] table.
    Known(Property),
    /// Anything else; its value passes through untransformed.
    Unknown(String),
}

impl PropertyKey {
    /// Classifies a property name.
    pub fn from_name(name: &str) -> Self {
        match Property::from_name(name) {
            Some(property) => PropertyKey::Known(property),
            None => PropertyKey::Unknown(name.to_owned()),
        }
    }

    /// The name of this property.
    pub fn name(&self) -> &str {
        match self {
            PropertyKey::Known(property) => property.name(),
            PropertyKey::Unknown(name) => name,
        }
    }
}

/// One `property: value` declaration within a rule body.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    /// The declared property.
    pub property: PropertyKey,
    /// The component values of the declared value.
    pub value: TokenList,
    /// Whether the declaration carries `!important`.
    pub important: bool,
    /// Where the declaration started in the source.
    pub location: SourceLocation,
}

impl ToCss for Declaration {
    fn to_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(self.property.name())?;
        dest.write_char(':')?;
        self.value[..].to_css(dest)?;
        if self.important {
            dest.write_str(" !important")?;
        }
        Ok(())
    }
}

/// A deferred edit to the declaration list.
#[derive(Debug)]
enum Mutation {
    Remove(usize),
    Replace(usize, Declaration),
}

/// Edits the shorthand trackers want applied, in the order they decided
/// them. Replaying the log onto the list at the end keeps the trackers from
/// shifting the indices they themselves hand out.
#[derive(Debug, Default)]
pub struct MutationLog {
    mutations: Vec<Mutation>,
}

impl MutationLog {
    /// Records the removal of the declaration at `index`.
    pub fn remove(&mut self, index: usize) {
        self.mutations.push(Mutation::Remove(index));
    }

    /// Records a replacement of the declaration at `index`.
    pub fn replace(&mut self, index: usize, declaration: Declaration) {
        self.mutations.push(Mutation::Replace(index, declaration));
    }

    /// Replays the log onto `declarations`, preserving the order of the
    /// survivors. A later mutation of a slot overrides an earlier one.
    pub fn apply(self, declarations: &mut Vec<Declaration>) {
        if self.mutations.is_empty() {
            return;
        }
        let mut slots: Vec<Option<Declaration>> = declarations.drain(..).map(Some).collect();
        for mutation in self.mutations {
            match mutation {
                Mutation::Remove(index) => slots[index] = None,
                Mutation::Replace(index, declaration) => slots[index] = Some(declaration),
            }
        }
        declarations.extend(slots.into_iter().flatten());
    }
}

/// Transforms the declarations of one rule body in place: value rewrites on
/// each declaration first, then the shorthand trackers over the stream, then
/// whitespace minification.
pub fn minify_declarations(declarations: &mut Vec<Declaration>, settings: &Settings) {
    for declaration in declarations.iter_mut() {
        rewrite_declaration_value(declaration, settings);
    }

    if settings.minify_syntax {
        let mut log = MutationLog::default();
        let mut margin = BoxSideTracker::new(&MARGIN_SIDES);
        let mut padding = BoxSideTracker::new(&PADDING_SIDES);
        let mut inset = BoxSideTracker::new(&INSET_SIDES);
        let mut radius = BorderRadiusTracker::default();
        for (index, declaration) in declarations.iter().enumerate() {
            margin.visit(declaration, index, &mut log);
            padding.visit(declaration, index, &mut log);
            inset.visit(declaration, index, &mut log);
            radius.visit(declaration, index, &mut log);
        }
        log.apply(declarations);
    }

    if settings.minify_whitespace {
        for declaration in declarations.iter_mut() {
            minify_whitespace(&mut declaration.value);
        }
    }
}

fn rewrite_declaration_value(declaration: &mut Declaration, settings: &Settings) {
    if settings.minify_syntax {
        calc::minify_calc_in_tokens(&mut declaration.value);
    }
    let property = match declaration.property {
        PropertyKey::Known(property) => property,
        PropertyKey::Unknown(_) => return,
    };
    if property.carries_color() {
        color::minify_color_tokens(&mut declaration.value, settings);
    }
    if property.carries_image() {
        if property == Property::Background {
            color::minify_color_tokens(&mut declaration.value, settings);
        }
        gradient::minify_gradients(&mut declaration.value, settings);
    }
    match property {
        Property::BoxShadow => box_shadow::minify_box_shadow(&mut declaration.value, settings),
        Property::Transform if settings.minify_syntax => {
            transform::minify_transform(&mut declaration.value)
        },
        Property::FontWeight if settings.minify_syntax => {
            font::minify_font_weight(&mut declaration.value)
        },
        Property::Font if settings.minify_syntax => font::minify_font(&mut declaration.value),
        _ => {},
    }
}
