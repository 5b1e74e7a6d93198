use std::fmt::Debug;

/// Fixed-width unsigned counter used as the generation stamp of a [`ListSet`].
///
/// `ZERO` is reserved as the "never visited" baseline, so a live set only ever
/// carries epochs in `1..=MAX`. Narrow widths trade more frequent full clears
/// for a denser stamp array.
///
/// [`ListSet`]: crate::sets::visited::ListSet
pub trait Epoch: Copy + Eq + Debug + Send + Sync + 'static {
    const ZERO: Self;
    const ONE: Self;

    /// Number of resets between two consecutive full clears.
    const GENERATIONS: u64;

    /// Next value, wrapping back to `ZERO` after the maximum.
    fn wrapping_next(self) -> Self;
}

macro_rules! impl_epoch {
    ($($t:ty),*) => {
        $(
            impl Epoch for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const GENERATIONS: u64 = <$t>::MAX as u64;

                #[inline]
                fn wrapping_next(self) -> Self {
                    self.wrapping_add(1)
                }
            }
        )*
    };
}

impl_epoch!(u8, u16, u32);
