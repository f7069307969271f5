use rust_xlsxwriter::{Format, Workbook, XlsxError};

const OUTPUT: &str = "sample_drilling_costs.xlsx";
const N_WELLS: usize = 24;

const HEADERS: [&str; 8] = [
    "Well_Job_ID",
    "Operator",
    "Contractor",
    "Total_Dil",
    "Haul_OFF",
    "IntLength",
    "DOW",
    "Basin",
];
const OPERATORS: [&str; 4] = [
    "Permian Energy",
    "Eagle Ford Oil",
    "Bakken Resources",
    "Delaware Ops",
];
const CONTRACTORS: [&str; 3] = ["H&P", "Patterson-UTI", "Nabors"];
const BASINS: [&str; 3] = ["Permian", "Williston", "Anadarko"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`, rounded to one decimal.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        ((lo + (hi - lo) * self.next_f64()) * 10.0).round() / 10.0
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<(), XlsxError> {
    let mut rng = SimpleRng::new(42);

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Wells")?;

    for (col, name) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }

    for i in 0..N_WELLS {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, format!("WJ-{:04}", 1001 + i))?;

        // One well without an operator to exercise the null filter path.
        if i != 7 {
            sheet.write_string(row, 1, rng.pick(&OPERATORS))?;
        }
        sheet.write_string(row, 2, rng.pick(&CONTRACTORS))?;

        let int_length = rng.range(800.0, 6500.0);
        sheet.write_number(row, 3, rng.range(150.0, 2200.0))?;
        sheet.write_number(row, 4, rng.range(50.0, 1400.0))?;
        // One interval of zero length: per-foot metrics are undefined there.
        sheet.write_number(row, 5, if i == 13 { 0.0 } else { int_length })?;
        sheet.write_number(row, 6, rng.range(2.0, 30.0).ceil())?;
        sheet.write_string(row, 7, rng.pick(&BASINS))?;
    }

    workbook.save(OUTPUT)?;
    println!("Wrote {N_WELLS} wells to {OUTPUT}");
    Ok(())
}
