pub use util::*;

mod util;

solutions![(
    y2023,
    [d1, d2, d4, d6, d8, d9, d10, d11, d15, d16, d17, d18, d20]
)];
