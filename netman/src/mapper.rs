//! Wire-model to domain-model transformations.
//!
//! A [`Mappable`] names the wire type it consumes, the domain type it
//! produces, and its own error type. The client decodes the wire type,
//! then hands it to [`Mappable::map`] exactly once. Pipeline failures are
//! converted into the mapper's error with `From<ApiError>`; errors raised by
//! `map` itself reach the caller untouched.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// A transformation from a decoded wire model into an application type.
///
/// ## Examples
///
/// ```rust,ignore
/// use netman::{ApiError, Mappable};
///
/// #[derive(serde::Deserialize)]
/// struct MovieDto { id: u64, title: String }
///
/// struct TitleMapper;
///
/// impl Mappable for TitleMapper {
///     type Input = MovieDto;
///     type Output = String;
///     type Error = ApiError;
///
///     fn map(&self, input: MovieDto) -> Result<String, ApiError> {
///         Ok(input.title)
///     }
/// }
/// ```
pub trait Mappable {
    /// The wire model decoded from the response body.
    type Input: DeserializeOwned;
    /// The application-level result.
    type Output;
    /// Error type of the transformation; must be able to carry pipeline errors.
    type Error: From<ApiError>;

    /// Transforms the decoded wire model.
    ///
    /// ## Errors
    ///
    /// Whatever the transformation considers a failure.
    fn map(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;
}

/// Adapts a closure into a [`Mappable`].
///
/// ## Examples
///
/// ```rust
/// use netman::{map_fn, ApiError, Mappable};
///
/// let doubled = map_fn(|n: u32| Ok::<_, ApiError>(n * 2));
/// assert_eq!(doubled.map(21).unwrap(), 42);
/// ```
pub struct FnMapper<I, O, E, F> {
    transform: F,
    _types: PhantomData<fn(I) -> Result<O, E>>,
}

impl<I, O, E, F> fmt::Debug for FnMapper<I, O, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMapper")
            .field("input", &std::any::type_name::<I>())
            .field("output", &std::any::type_name::<O>())
            .finish()
    }
}

impl<I, O, E, F> Mappable for FnMapper<I, O, E, F>
where
    I: DeserializeOwned,
    E: From<ApiError>,
    F: Fn(I) -> Result<O, E>,
{
    type Input = I;
    type Output = O;
    type Error = E;

    fn map(&self, input: I) -> Result<O, E> {
        (self.transform)(input)
    }
}

/// Wraps `transform` as a [`Mappable`].
pub fn map_fn<I, O, E, F>(transform: F) -> FnMapper<I, O, E, F>
where
    F: Fn(I) -> Result<O, E>,
{
    FnMapper {
        transform,
        _types: PhantomData,
    }
}
