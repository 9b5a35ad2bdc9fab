use core::fmt::Debug;
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, Gamma, GammaError};

/// Trait for floating-point tensor elements.
///
/// Blanket bounds cover everything the closed-form statistics need
/// (`ln`, `sqrt`, `exp`, comparisons). Random variate generation is a
/// per-type method because `rand_distr`'s samplers carry bounds that are
/// only satisfiable for concrete float types.
pub trait FloatScalar: Float + Debug + Default + Send + Sync + 'static {
    /// Draw one variate from Gamma(`shape`, `scale`).
    ///
    /// Fails when `shape` or `scale` is not strictly positive and finite.
    fn gamma_variate<R: Rng + ?Sized>(shape: Self, scale: Self, rng: &mut R)
        -> Result<Self, GammaError>;
}

macro_rules! impl_float_scalar {
    ($($t:ty),*) => {
        $(
            impl FloatScalar for $t {
                #[inline]
                fn gamma_variate<R: Rng + ?Sized>(
                    shape: $t,
                    scale: $t,
                    rng: &mut R,
                ) -> Result<$t, GammaError> {
                    Ok(Gamma::new(shape, scale)?.sample(rng))
                }
            }
        )*
    };
}

impl_float_scalar!(f32, f64);
