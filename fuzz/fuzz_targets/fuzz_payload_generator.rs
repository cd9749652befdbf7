#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use redforge::generator::{DefaultPayloadGenerator, PayloadGenerator};
use redforge_core::model::{Technique, TechniqueSource};

#[derive(Debug, Arbitrary)]
struct Input {
    technique_id: String,
    name: String,
    tactic: String,
    n: u8,
    include_benign: bool,
    seed: u64,
}

fuzz_target!(|input: Input| {
    let technique = Technique::new(
        input.technique_id,
        input.name,
        TechniqueSource::Attack,
        vec![input.tactic],
        Vec::new(),
    );
    let generator = DefaultPayloadGenerator::new();
    let _ = generator.generate(&technique, input.n as usize, input.include_benign, input.seed);
});
