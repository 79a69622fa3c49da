#![no_main]

use edit_tree::model::BuildEquivalenceInput;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: BuildEquivalenceInput| {
    edit_tree::model::run_build_equivalence(input.values, input.ops);
});
