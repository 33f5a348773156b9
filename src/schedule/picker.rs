use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses one of `candidates` eligible teachers by index.
///
/// Implementations must return a value below `candidates`, which is never zero.
pub trait TeacherPicker {
    fn pick(&mut self, candidates: usize) -> usize;
}

/// Uniform random choice, the default for generating versions
#[derive(Debug, Clone)]
pub struct RandomPicker<R = StdRng> {
    rng: R,
}

impl RandomPicker<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TeacherPicker for RandomPicker<R> {
    fn pick(&mut self, candidates: usize) -> usize {
        self.rng.gen_range(0..candidates)
    }
}

/// Always takes the first eligible teacher
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTeacher;

impl TeacherPicker for FirstTeacher {
    fn pick(&mut self, _candidates: usize) -> usize {
        0
    }
}

impl<P: TeacherPicker + ?Sized> TeacherPicker for &mut P {
    fn pick(&mut self, candidates: usize) -> usize {
        (**self).pick(candidates)
    }
}
