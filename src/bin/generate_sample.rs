use std::io::Write;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const COUNTRY_CODES: &[&str] = &["DE", "LV", "PL", "FR", "AT", "SE"];

const ENVIRONMENTAL_TITLES: &[&str] = &[
    "Air quality monitoring network",
    "Emission inventory update",
    "Atmospheric dispersion modelling study",
    "Environmental impact assessment",
    "Strategic noise mapping",
    "Noise barrier design",
    "Model-based flood risk analysis",
];

const OTHER_TITLES: &[&str] = &[
    "Supply of office furniture",
    "School catering services",
    "Bridge maintenance works",
    "IT helpdesk outsourcing",
    "Hospital laundry services",
    "Snow clearing",
];

const AUTHORITIES: &[&str] = &[
    "City Council",
    "Ministry of Environment",
    "Regional Transport Authority",
    "State Health Agency",
];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows = 600;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());
    csv_writer
        .write_record([
            "ID_NOTICE_CAN",
            "ISO_COUNTRY_CODE",
            "CAE_NAME",
            "TITLE",
            "DATE_PUBLICATION",
            "VALUE_EURO",
        ])
        .expect("Failed to write header");

    for id in 0..rows {
        let country = rng.pick(COUNTRY_CODES);
        let authority = format!("{} ({country})", rng.pick(AUTHORITIES));

        // Roughly one in three notices is environmental, a few have no title.
        let title = match rng.below(30) {
            0 => String::new(),
            1..=10 => rng.pick(ENVIRONMENTAL_TITLES).to_string(),
            _ => rng.pick(OTHER_TITLES).to_string(),
        };

        // 18 months starting January 2023, with an occasional unreadable date.
        let month = rng.below(18);
        let date = if rng.below(50) == 0 {
            "n/a".to_string()
        } else {
            format!(
                "{}-{:02}-{:02}",
                2023 + month / 12,
                month % 12 + 1,
                rng.below(28) + 1
            )
        };

        let value = format!("{}", 10_000 + rng.below(2_000_000));

        csv_writer
            .write_record([
                format!("2023-{id:06}"),
                country.to_string(),
                authority,
                title,
                date,
                value,
            ])
            .expect("Failed to write row");
    }

    let csv_bytes = csv_writer.into_inner().expect("Failed to flush CSV");

    let output_path = "sample_ted_export.zip";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file("TED_EXPORT.csv", options)
        .expect("Failed to start archive entry");
    zip.write_all(&csv_bytes).expect("Failed to write archive entry");
    zip.finish().expect("Failed to finish archive");

    println!("Wrote {rows} tenders to {output_path}");
}
