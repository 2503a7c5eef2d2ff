#![allow(dead_code)]

use pixcode::PaymentIdentity;
use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use std::io::Error;
use std::path::Path;

const LETTERS: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'x', 'z', 'A', 'B', 'M', 'P', 'S', 'á', 'à', 'â', 'ã', 'é', 'ê', 'í', 'ó',
    'ô', 'õ', 'ú', 'ü', 'ç', 'Á', 'É', 'Ç', 'Õ', ' ', ' ', '-', '\'',
];

const KEYS: &[&str] = &[
    "71288441479",
    "+5587991025860",
    "fulano@example.com",
    "123e4567-e12b-12d1-a456-426655440000",
    "12345678000195",
];

pub fn random_text<R: Rng>(rng: &mut R, max_len: usize) -> String {
    let len = rng.gen_range(0..=max_len);
    (0..len)
        .map(|_| *LETTERS.choose(rng).unwrap_or(&'x'))
        .collect()
}

pub fn random_identity<R: Rng>(rng: &mut R) -> PaymentIdentity {
    let key = *KEYS.choose(rng).unwrap_or(&KEYS[0]);
    let mut identity =
        PaymentIdentity::new(key, random_text(rng, 40), random_text(rng, 40)).unwrap();
    if rng.gen_bool(0.5) {
        let cents: i64 = rng.gen_range(0..10_000_000);
        identity = identity.with_amount(Decimal::new(cents, 2)).unwrap();
    }
    if rng.gen_bool(0.5) {
        let txid: String = (0..rng.gen_range(1..=25))
            .map(|_| rng.gen_range(b'A'..=b'Z') as char)
            .collect();
        identity = identity.with_transaction_id(&txid).unwrap();
    }
    identity
}

pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let mut rng = rand::thread_rng();
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;

    wtr.write_record(["key", "name", "city", "amount", "transaction_id"])?;

    for i in 1..=rows {
        let key = *KEYS.choose(&mut rng).unwrap_or(&KEYS[0]);
        let name = random_text(&mut rng, 30);
        let city = random_text(&mut rng, 30);
        let amount = format!("{}.{:02}", i, i % 100);
        wtr.write_record([key, name.as_str(), city.as_str(), amount.as_str(), ""])?;
    }

    wtr.flush()?;
    Ok(())
}
