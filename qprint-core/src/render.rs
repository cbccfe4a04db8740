// Value rendering
//
// Every argument declares one `Shape`. `render` is the only place that
// decides how a shape becomes text, so the precedence between scalars,
// pairs and sequences is fixed by which shape a type reports: a type
// with a native text form (e.g. `String`) reports `Scalar` even though
// it is also iterable.
//
// Recursion through nested containers is unbounded.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt::{self, Display, LowerExp};
use std::io::{self, Write};

use crate::config::{BoolStyle, Config};
use crate::template::DisplayMode;

/// A value with a native, non-recursive text form.
#[derive(Clone, Copy)]
pub enum Scalar<'a> {
    Signed(i128),
    Unsigned(u128),
    F32(f32),
    F64(f64),
    Bool(bool),
    Char(char),
    Str(&'a str),
    Display(&'a dyn Display),
}

/// The capability a value renders through.
pub enum Shape<'a> {
    Scalar(Scalar<'a>),
    Pair(&'a dyn Render, &'a dyn Render),
    /// Elements are reached through [`Render::elements`].
    Sequence,
}

/// A value that can be substituted into a placeholder.
pub trait Render {
    fn shape(&self) -> Shape<'_>;

    /// Visit each element in iteration order. Only sequences have any.
    fn elements(&self, visitor: &mut dyn FnMut(&dyn Render) -> io::Result<()>) -> io::Result<()> {
        let _ = visitor;
        Ok(())
    }
}

/// Settings active while one argument is rendered.
///
/// Built fresh for every placeholder, so a modifier never outlives the
/// argument it applies to.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub mode: DisplayMode,
    pub show_base: bool,
    pub bool_style: BoolStyle,
    pub precision: usize,
}

impl RenderContext {
    pub fn new(config: &Config, mode: DisplayMode) -> Self {
        Self {
            mode,
            show_base: config.show_base,
            bool_style: config.bool_style,
            precision: config.float_precision,
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(&Config::default(), DisplayMode::Default)
    }
}

/// Write `value` to `sink`.
///
/// Pairs render as `(first, second)`, sequences as `{a, b, c}`; the active
/// mode carries into nested elements.
pub fn render<W: Write + ?Sized>(
    sink: &mut W,
    value: &dyn Render,
    ctx: &RenderContext,
) -> io::Result<()> {
    match value.shape() {
        Shape::Scalar(scalar) => write_scalar(sink, scalar, ctx),
        Shape::Pair(first, second) => {
            sink.write_all(b"(")?;
            render(sink, first, ctx)?;
            sink.write_all(b", ")?;
            render(sink, second, ctx)?;
            sink.write_all(b")")
        }
        Shape::Sequence => {
            sink.write_all(b"{")?;
            let mut first = true;
            value.elements(&mut |element: &dyn Render| {
                if !first {
                    sink.write_all(b", ")?;
                }
                first = false;
                render(sink, element, ctx)
            })?;
            sink.write_all(b"}")
        }
    }
}

fn write_scalar<W: Write + ?Sized>(
    sink: &mut W,
    scalar: Scalar<'_>,
    ctx: &RenderContext,
) -> io::Result<()> {
    match scalar {
        Scalar::Signed(v) => write_integer(sink, v < 0, v.unsigned_abs(), ctx),
        Scalar::Unsigned(v) => write_integer(sink, false, v, ctx),
        Scalar::F32(v) => write_float(sink, v, ctx),
        Scalar::F64(v) => write_float(sink, v, ctx),
        Scalar::Bool(v) => match (ctx.mode, ctx.bool_style) {
            (DisplayMode::BoolWord, _) | (_, BoolStyle::Word) => write!(sink, "{}", v),
            (_, BoolStyle::Numeric) => write!(sink, "{}", u8::from(v)),
        },
        Scalar::Char(c) => write!(sink, "{}", c),
        Scalar::Str(s) => sink.write_all(s.as_bytes()),
        Scalar::Display(d) => write!(sink, "{}", d),
    }
}

// Hex and octal print sign and magnitude: -10 under {x} is -0xa.
fn write_integer<W: Write + ?Sized>(
    sink: &mut W,
    negative: bool,
    magnitude: u128,
    ctx: &RenderContext,
) -> io::Result<()> {
    let sign = if negative { "-" } else { "" };
    match (ctx.mode, ctx.show_base) {
        (DisplayMode::Hex, true) => write!(sink, "{}{:#x}", sign, magnitude),
        (DisplayMode::Hex, false) => write!(sink, "{}{:x}", sign, magnitude),
        (DisplayMode::Octal, true) => write!(sink, "{}{:#o}", sign, magnitude),
        (DisplayMode::Octal, false) => write!(sink, "{}{:o}", sign, magnitude),
        _ => write!(sink, "{}{}", sign, magnitude),
    }
}

fn write_float<W, F>(sink: &mut W, value: F, ctx: &RenderContext) -> io::Result<()>
where
    W: Write + ?Sized,
    F: Display + LowerExp,
{
    match ctx.mode {
        DisplayMode::Fixed => write!(sink, "{:.*}", ctx.precision, value),
        DisplayMode::Scientific => write_scientific(sink, value, ctx.precision),
        _ => write!(sink, "{}", value),
    }
}

// `{:e}` prints `1e1`; scientific mode wants `1.000000e+01`.
fn write_scientific<W, F>(sink: &mut W, value: F, precision: usize) -> io::Result<()>
where
    W: Write + ?Sized,
    F: LowerExp,
{
    let text = format!("{:.*e}", precision, value);
    let Some((mantissa, exponent)) = text.split_once('e') else {
        // inf and NaN have no exponent
        return sink.write_all(text.as_bytes());
    };
    match exponent.parse::<i32>() {
        Ok(exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(sink, "{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
        }
        Err(_) => sink.write_all(text.as_bytes()),
    }
}

/// Renders any `Display` type as a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text<T>(pub T);

impl<T: Display> Render for Text<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Display(&self.0))
    }
}

impl<T: Display> Display for Text<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

macro_rules! render_signed {
    ($($ty:ty),*) => {
        $(impl Render for $ty {
            fn shape(&self) -> Shape<'_> {
                Shape::Scalar(Scalar::Signed(*self as i128))
            }
        })*
    };
}

macro_rules! render_unsigned {
    ($($ty:ty),*) => {
        $(impl Render for $ty {
            fn shape(&self) -> Shape<'_> {
                Shape::Scalar(Scalar::Unsigned(*self as u128))
            }
        })*
    };
}

render_signed!(i8, i16, i32, i64, i128, isize);
render_unsigned!(u8, u16, u32, u64, u128, usize);

impl Render for f32 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::F32(*self))
    }
}

impl Render for f64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::F64(*self))
    }
}

impl Render for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Bool(*self))
    }
}

impl Render for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Char(*self))
    }
}

impl Render for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(self))
    }
}

impl Render for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(self))
    }
}

impl Render for Cow<'_, str> {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(self))
    }
}

impl<T: Render + ?Sized> Render for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn elements(&self, visitor: &mut dyn FnMut(&dyn Render) -> io::Result<()>) -> io::Result<()> {
        (**self).elements(visitor)
    }
}

impl<T: Render + ?Sized> Render for &mut T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn elements(&self, visitor: &mut dyn FnMut(&dyn Render) -> io::Result<()>) -> io::Result<()> {
        (**self).elements(visitor)
    }
}

impl<T: Render + ?Sized> Render for Box<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn elements(&self, visitor: &mut dyn FnMut(&dyn Render) -> io::Result<()>) -> io::Result<()> {
        (**self).elements(visitor)
    }
}

impl<A: Render, B: Render> Render for (A, B) {
    fn shape(&self) -> Shape<'_> {
        Shape::Pair(&self.0, &self.1)
    }
}

macro_rules! render_sequence {
    ($(impl<$($param:ident),*> for $ty:ty;)*) => {
        $(
            impl<$($param),*> Render for $ty
            where
                T: Render,
            {
                fn shape(&self) -> Shape<'_> {
                    Shape::Sequence
                }

                fn elements(
                    &self,
                    visitor: &mut dyn FnMut(&dyn Render) -> io::Result<()>,
                ) -> io::Result<()> {
                    for element in self.iter() {
                        visitor(element)?;
                    }
                    Ok(())
                }
            }
        )*
    };
}

render_sequence! {
    impl<T> for [T];
    impl<T> for Vec<T>;
    impl<T> for VecDeque<T>;
    impl<T> for LinkedList<T>;
    impl<T> for BTreeSet<T>;
    impl<T, S> for HashSet<T, S>;
}

impl<T: Render, const N: usize> Render for [T; N] {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence
    }

    fn elements(&self, visitor: &mut dyn FnMut(&dyn Render) -> io::Result<()>) -> io::Result<()> {
        self.as_slice().elements(visitor)
    }
}

// Map entries render as pairs.
macro_rules! render_map {
    ($(impl<$($param:ident),*> for $ty:ty;)*) => {
        $(
            impl<$($param),*> Render for $ty
            where
                K: Render,
                V: Render,
            {
                fn shape(&self) -> Shape<'_> {
                    Shape::Sequence
                }

                fn elements(
                    &self,
                    visitor: &mut dyn FnMut(&dyn Render) -> io::Result<()>,
                ) -> io::Result<()> {
                    for entry in self.iter() {
                        visitor(&entry)?;
                    }
                    Ok(())
                }
            }
        )*
    };
}

render_map! {
    impl<K, V> for BTreeMap<K, V>;
    impl<K, V, S> for HashMap<K, V, S>;
}
