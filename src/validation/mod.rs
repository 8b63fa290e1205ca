//! Round-trip correctness checks
//!
//! Before any timing, every codec must reproduce the dataset exactly in both
//! shapes. A codec that fails here is never benchmarked.

pub mod validation_compare;

pub use validation_compare::compare_records;

use crate::codec::{Codec, DatasetCodec};
use crate::dataset::{Dataset, Shape};
use crate::error::{CodecError, ValidationError, ValidationResult};
use crate::model::Container;

/// Round-trip validator
pub struct RoundTripValidator;

impl RoundTripValidator {
    /// True when `codec` round-trips `dataset` in both shapes
    pub fn validate<C, D>(codec: &D, dataset: &Dataset<C>) -> bool
    where
        C: Container,
        D: DatasetCodec<C> + ?Sized,
    {
        Self::check(codec, dataset).is_ok()
    }

    /// Check both shapes, separate items first, reporting the first failure
    pub fn check<C, D>(codec: &D, dataset: &Dataset<C>) -> ValidationResult<()>
    where
        C: Container,
        D: DatasetCodec<C> + ?Sized,
    {
        Self::check_separate(codec, dataset)?;
        Self::check_single(codec, dataset)
    }

    /// Encode the items as separate units, decode them and compare
    pub fn check_separate<C, D>(codec: &D, dataset: &Dataset<C>) -> ValidationResult<()>
    where
        C: Container,
        D: DatasetCodec<C> + ?Sized,
    {
        let wrap = codec_failure(codec.name(), Shape::Separate);
        let bytes = Codec::<C::Item>::serialize_many(codec, dataset.separate()).map_err(&wrap)?;
        let decoded = Codec::<C::Item>::deserialize_many(codec, &bytes).map_err(&wrap)?;
        compare_records(codec.name(), Shape::Separate, dataset.separate(), &decoded)
    }

    /// Encode the container as one object, decode it and compare its items
    pub fn check_single<C, D>(codec: &D, dataset: &Dataset<C>) -> ValidationResult<()>
    where
        C: Container,
        D: DatasetCodec<C> + ?Sized,
    {
        let wrap = codec_failure(codec.name(), Shape::Single);
        let bytes = Codec::<C>::serialize_one(codec, dataset.single()).map_err(&wrap)?;
        let decoded = Codec::<C>::deserialize_one(codec, &bytes).map_err(&wrap)?;
        compare_records(codec.name(), Shape::Single, dataset.single().items(), decoded.items())
    }
}

fn codec_failure(codec: &str, shape: Shape) -> impl Fn(CodecError) -> ValidationError + '_ {
    move |source| ValidationError::Codec {
        codec: codec.to_string(),
        shape: shape.to_string(),
        source,
    }
}
