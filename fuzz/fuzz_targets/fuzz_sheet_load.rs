#![no_main]

use libfuzzer_sys::fuzz_target;
use saldo::core::Input;
use saldo::sheet::Grid;

fuzz_target!(|data: &[u8]| {
    // Must not panic; unreadable input is an error.
    if let Ok(grid) = Grid::load_with_formulas(data, Input::Template) {
        let _ = grid.header(1);
        let _ = grid.cells().count();
    }
});
