use crate::domain::crc::checksum;
use crate::domain::identity::{Amount, PIX_GUI, PaymentIdentity};
use crate::domain::normalize::{CITY_MAX_LEN, NAME_MAX_LEN, normalize};
use crate::domain::tlv::{Tag, TlvField, TlvReader, format_field};
use crate::error::{PixError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

const PAYLOAD_FORMAT_INDICATOR: &str = "01";
/// Generic / unclassified merchant.
const MERCHANT_CATEGORY_CODE: &str = "0000";
/// BRL, ISO 4217 numeric.
const CURRENCY_BRL: &str = "986";
const COUNTRY_CODE: &str = "BR";
/// Id and fixed length of the CRC field; part of the checksummed input.
const CRC_PREFIX: &str = "6304";
const CRC_LEN: usize = 4;

/// Fields recovered from a payload accepted by [`PixPayloadEncoder::decode`].
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct DecodedPayload {
    pub key: String,
    pub name: String,
    pub city: String,
    pub amount: Option<Decimal>,
    pub transaction_id: String,
    pub crc: String,
}

/// Builds and checks static Pix BR Codes.
///
/// The encoder is stateless apart from its text limits, so one instance can
/// be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixPayloadEncoder {
    name_max_len: usize,
    city_max_len: usize,
}

impl Default for PixPayloadEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PixPayloadEncoder {
    /// Creates an encoder with [`NAME_MAX_LEN`] and [`CITY_MAX_LEN`].
    pub fn new() -> Self {
        Self {
            name_max_len: NAME_MAX_LEN,
            city_max_len: CITY_MAX_LEN,
        }
    }

    /// Overrides the city truncation width, e.g. with
    /// [`STANDARD_CITY_MAX_LEN`](crate::domain::normalize::STANDARD_CITY_MAX_LEN).
    pub fn with_city_max_len(mut self, city_max_len: usize) -> Self {
        self.city_max_len = city_max_len;
        self
    }

    pub fn city_max_len(&self) -> usize {
        self.city_max_len
    }

    /// Produces the complete, checksummed payload for `identity`.
    ///
    /// Either the whole payload is returned or an error; a payload without
    /// its CRC is never handed out.
    pub fn encode(&self, identity: &PaymentIdentity) -> Result<String> {
        let mut payload = self.assemble(identity)?;
        let crc = checksum(&payload);
        payload.push_str(&crc);

        debug!(key = identity.key(), len = payload.len(), %crc, "encoded payload");
        Ok(payload)
    }

    /// Everything up to and including `6304`, in the mandated field order.
    fn assemble(&self, identity: &PaymentIdentity) -> Result<String> {
        let name = ascii_text(
            Tag::MerchantName,
            normalize(identity.name(), self.name_max_len),
        )?;
        let city = ascii_text(
            Tag::MerchantCity,
            normalize(identity.city(), self.city_max_len),
        )?;

        let merchant_account_info = [
            format_field(Tag::Gui, PIX_GUI)?,
            format_field(Tag::PixKey, identity.key())?,
        ]
        .concat();
        let additional_data =
            format_field(Tag::ReferenceLabel, identity.transaction_id().as_str())?;

        let mut payload = String::with_capacity(128);
        payload.push_str(&format_field(
            Tag::PayloadFormatIndicator,
            PAYLOAD_FORMAT_INDICATOR,
        )?);
        payload.push_str(&format_field(
            Tag::MerchantAccountInfo,
            &merchant_account_info,
        )?);
        payload.push_str(&format_field(
            Tag::MerchantCategoryCode,
            MERCHANT_CATEGORY_CODE,
        )?);
        payload.push_str(&format_field(Tag::TransactionCurrency, CURRENCY_BRL)?);
        if let Some(amount) = identity.amount() {
            payload.push_str(&format_field(Tag::TransactionAmount, &amount.to_string())?);
        }
        payload.push_str(&format_field(Tag::CountryCode, COUNTRY_CODE)?);
        payload.push_str(&format_field(Tag::MerchantName, &name)?);
        payload.push_str(&format_field(Tag::MerchantCity, &city)?);
        payload.push_str(&format_field(Tag::AdditionalData, &additional_data)?);
        payload.push_str(CRC_PREFIX);
        Ok(payload)
    }

    /// Checks a payload produced by this encoder (or an equivalent static
    /// Pix BR Code) and returns its fields.
    ///
    /// The CRC is verified first, then every field is read back in the fixed
    /// order. Unknown, missing or reordered tags are rejected.
    pub fn decode(&self, payload: &str) -> Result<DecodedPayload> {
        let split = payload
            .len()
            .checked_sub(CRC_LEN)
            .filter(|&split| payload.is_char_boundary(split))
            .ok_or_else(|| PixError::MalformedPayload("payload too short".to_string()))?;
        let (body, found) = payload.split_at(split);

        let fields = body
            .strip_suffix(CRC_PREFIX)
            .ok_or_else(|| PixError::MalformedPayload("missing CRC field".to_string()))?;
        if !found
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
        {
            return Err(PixError::MalformedPayload(format!(
                "CRC {found:?} is not four uppercase hex digits"
            )));
        }
        let expected = checksum(body);
        if expected != found {
            return Err(PixError::ChecksumMismatch {
                expected,
                found: found.to_string(),
            });
        }

        let mut top = FieldCursor::read(fields)?;
        top.expect_const(Tag::PayloadFormatIndicator, PAYLOAD_FORMAT_INDICATOR)?;

        let mut account = FieldCursor::read(top.expect(Tag::MerchantAccountInfo)?)?;
        account.expect_const(Tag::Gui, PIX_GUI)?;
        let key = account.expect(Tag::PixKey)?;
        account.finish(Tag::MerchantAccountInfo)?;

        top.expect_const(Tag::MerchantCategoryCode, MERCHANT_CATEGORY_CODE)?;
        top.expect_const(Tag::TransactionCurrency, CURRENCY_BRL)?;
        let amount = top
            .optional(Tag::TransactionAmount)
            .map(parse_amount)
            .transpose()?;
        top.expect_const(Tag::CountryCode, COUNTRY_CODE)?;
        let name = top.expect(Tag::MerchantName)?;
        let city = top.expect(Tag::MerchantCity)?;

        let mut additional = FieldCursor::read(top.expect(Tag::AdditionalData)?)?;
        let transaction_id = additional.expect(Tag::ReferenceLabel)?;
        additional.finish(Tag::AdditionalData)?;
        top.finish(Tag::Crc)?;

        debug!(key, crc = found, "decoded payload");
        Ok(DecodedPayload {
            key: key.to_string(),
            name: name.to_string(),
            city: city.to_string(),
            amount,
            transaction_id: transaction_id.to_string(),
            crc: found.to_string(),
        })
    }
}

/// Letters with no ASCII base form (`Ø`, emoji) survive normalization and
/// are refused here.
fn ascii_text(tag: Tag, value: String) -> Result<String> {
    if value.is_ascii() {
        Ok(value)
    } else {
        Err(PixError::InvalidCharacters {
            field: tag.name(),
            value,
        })
    }
}

/// Amounts must read back in the exact `0.00` form the encoder writes.
fn parse_amount(value: &str) -> Result<Decimal> {
    let parsed = Decimal::from_str(value)
        .map_err(|e| PixError::MalformedAmount(format!("{value:?}: {e}")))?;
    let amount = Amount::new(parsed)?;
    if amount.to_string() != value {
        return Err(PixError::MalformedAmount(format!(
            "{value:?} is not written with two decimal places"
        )));
    }
    Ok(amount.value())
}

/// Sequential access to the fields of one TLV level.
struct FieldCursor<'a> {
    fields: Vec<TlvField<'a>>,
    pos: usize,
}

impl<'a> FieldCursor<'a> {
    fn read(input: &'a str) -> Result<Self> {
        Ok(Self {
            fields: TlvReader::new(input).collect::<Result<_>>()?,
            pos: 0,
        })
    }

    fn optional(&mut self, tag: Tag) -> Option<&'a str> {
        let field = self.fields.get(self.pos).copied().filter(|f| f.id == tag.id())?;
        self.pos += 1;
        Some(field.value)
    }

    fn expect(&mut self, tag: Tag) -> Result<&'a str> {
        self.optional(tag).ok_or_else(|| match self.fields.get(self.pos) {
            Some(found) => {
                PixError::MalformedPayload(format!("expected field {tag}, found {}", found.id))
            }
            None => PixError::MalformedPayload(format!("missing field {tag}")),
        })
    }

    fn expect_const(&mut self, tag: Tag, expected: &str) -> Result<()> {
        let value = self.expect(tag)?;
        if value != expected {
            return Err(PixError::MalformedPayload(format!(
                "field {tag} is {value:?}, expected {expected:?}"
            )));
        }
        Ok(())
    }

    /// Fails if fields remain after the last expected one; `next` names
    /// what should have come instead.
    fn finish(&self, next: Tag) -> Result<()> {
        match self.fields.get(self.pos) {
            Some(extra) => Err(PixError::MalformedPayload(format!(
                "unexpected field {} before {next}",
                extra.id
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crc::crc16;
    use crate::domain::normalize::STANDARD_CITY_MAX_LEN;
    use rust_decimal_macros::dec;

    const LANDING_PAGE_PAYLOAD: &str = "00020126330014br.gov.bcb.pix0111712884414795204000053039865802BR5925PEDRO HENRIQUE ALVES ANDR6014PESQUEIRA - PE62070503***6304E93C";

    fn landing_page_identity() -> PaymentIdentity {
        PaymentIdentity::new(
            "71288441479",
            "Pedro Henrique Alves Andrade",
            "Pesqueira - PE",
        )
        .unwrap()
    }

    #[test]
    fn test_encode_landing_page_identity() {
        let payload = PixPayloadEncoder::new()
            .encode(&landing_page_identity())
            .unwrap();
        assert_eq!(payload, LANDING_PAGE_PAYLOAD);
    }

    #[test]
    fn test_encode_with_amount() {
        let identity = landing_page_identity().with_amount(dec!(10)).unwrap();
        let payload = PixPayloadEncoder::new().encode(&identity).unwrap();

        assert!(payload.contains("5303986540510.005802BR"));
        assert!(payload.ends_with("6304F0C1"));
    }

    #[test]
    fn test_encode_with_accents_and_reference() {
        let identity =
            PaymentIdentity::new("joao@example.com", "João da Conceição", "São Paulo")
                .unwrap()
                .with_amount(dec!(1234.56))
                .unwrap()
                .with_transaction_id("PEDIDO42")
                .unwrap();
        let payload = PixPayloadEncoder::new().encode(&identity).unwrap();

        assert_eq!(
            payload,
            "00020126380014br.gov.bcb.pix0116joao@example.com52040000530398654071234.565802BR5917JOAO DA CONCEICAO6009SAO PAULO62120508PEDIDO4263044F33"
        );
    }

    #[test]
    fn test_amount_omitted_when_absent() {
        let payload = PixPayloadEncoder::new()
            .encode(&landing_page_identity())
            .unwrap();
        let tags: Vec<_> = TlvReader::new(&payload[..payload.len() - 8])
            .map(|f| f.unwrap().id)
            .collect();
        assert_eq!(tags, ["00", "26", "52", "53", "58", "59", "60", "62"]);
        assert!(!payload.contains("5400"));
    }

    #[test]
    fn test_checksum_covers_crc_prefix() {
        let payload = PixPayloadEncoder::new()
            .encode(&landing_page_identity())
            .unwrap();
        let (body, crc) = payload.split_at(payload.len() - 4);
        assert!(body.ends_with("6304"));
        assert_eq!(format!("{:04X}", crc16(body.bytes())), crc);
    }

    #[test]
    fn test_city_limit_override() {
        let identity =
            PaymentIdentity::new("71288441479", "Fulano", "Santo Antônio de Jesus").unwrap();

        let default = PixPayloadEncoder::new().encode(&identity).unwrap();
        assert!(default.contains("6022SANTO ANTONIO DE JESUS"));

        let strict = PixPayloadEncoder::new()
            .with_city_max_len(STANDARD_CITY_MAX_LEN)
            .encode(&identity)
            .unwrap();
        assert!(strict.contains("6015SANTO ANTONIO D62"));
    }

    #[test]
    fn test_name_without_ascii_form_is_rejected() {
        let identity = PaymentIdentity::new("71288441479", "Øyvind", "Recife").unwrap();
        assert!(matches!(
            PixPayloadEncoder::new().encode(&identity),
            Err(PixError::InvalidCharacters { field: "name", .. })
        ));

        let emoji = PaymentIdentity::new("71288441479", "😀".repeat(25), "Recife").unwrap();
        assert!(matches!(
            PixPayloadEncoder::new().encode(&emoji),
            Err(PixError::InvalidCharacters { field: "name", .. })
        ));
    }

    #[test]
    fn test_city_without_ascii_form_is_rejected() {
        let identity = PaymentIdentity::new("71288441479", "Fulano", "Łódź").unwrap();
        assert!(matches!(
            PixPayloadEncoder::new().encode(&identity),
            Err(PixError::InvalidCharacters { field: "city", .. })
        ));
    }

    #[test]
    fn test_decode_rejects_amount_over_length_limit() {
        let body = "00020126330014br.gov.bcb.pix01117128844147952040000530398654\
                    1410000000000.005802BR5906FULANO6006RECIFE62070503***6304";
        let payload = format!("{body}{}", checksum(body));
        assert!(matches!(
            PixPayloadEncoder::new().decode(&payload),
            Err(PixError::MalformedAmount(_))
        ));
    }

    #[test]
    fn test_decode_rejects_amount_without_cents() {
        let body = "00020126330014br.gov.bcb.pix01117128844147952040000530398654\
                    0210005802BR5906FULANO6006RECIFE62070503***6304";
        let payload = format!("{body}{}", checksum(body));
        assert!(matches!(
            PixPayloadEncoder::new().decode(&payload),
            Err(PixError::MalformedAmount(_))
        ));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = PixPayloadEncoder::new();
        let identity = landing_page_identity().with_amount(dec!(99.90)).unwrap();
        assert_eq!(
            encoder.encode(&identity).unwrap(),
            encoder.encode(&identity).unwrap()
        );
    }

    #[test]
    fn test_decode_roundtrip_fields() {
        let encoder = PixPayloadEncoder::new();
        let decoded = encoder.decode(LANDING_PAGE_PAYLOAD).unwrap();
        assert_eq!(decoded.key, "71288441479");
        assert_eq!(decoded.name, "PEDRO HENRIQUE ALVES ANDR");
        assert_eq!(decoded.city, "PESQUEIRA - PE");
        assert_eq!(decoded.amount, None);
        assert_eq!(decoded.transaction_id, "***");
        assert_eq!(decoded.crc, "E93C");
    }

    #[test]
    fn test_decode_reads_amount() {
        let decoded = PixPayloadEncoder::new()
            .decode("00020126580014br.gov.bcb.pix0136123e4567-e12b-12d1-a456-42665544000052040000530398654040.505802BR5913FULANO DE TAL6008BRASILIA62070503***63044F1F")
            .unwrap();
        assert_eq!(decoded.amount, Some(dec!(0.50)));
        assert_eq!(decoded.key, "123e4567-e12b-12d1-a456-426655440000");
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        let tampered = LANDING_PAGE_PAYLOAD.replace("6304E93C", "6304E93D");
        assert!(matches!(
            PixPayloadEncoder::new().decode(&tampered),
            Err(PixError::ChecksumMismatch { .. })
        ));

        let edited = LANDING_PAGE_PAYLOAD.replace("71288441479", "71288441478");
        assert!(matches!(
            PixPayloadEncoder::new().decode(&edited),
            Err(PixError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_lowercase_crc() {
        let lower = LANDING_PAGE_PAYLOAD.replace("6304E93C", "6304e93c");
        assert!(matches!(
            PixPayloadEncoder::new().decode(&lower),
            Err(PixError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_decode_rejects_short_input() {
        assert!(matches!(
            PixPayloadEncoder::new().decode("63"),
            Err(PixError::MalformedPayload(_))
        ));
        assert!(matches!(
            PixPayloadEncoder::new().decode("00020101"),
            Err(PixError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_decode_rejects_reordered_fields() {
        let body = "00020126330014br.gov.bcb.pix01117128844147953039865204000058 02BR5925PEDRO HENRIQUE ALVES ANDR6014PESQUEIRA - PE62070503***6304"
            .replace(' ', "");
        let payload = format!("{body}{}", checksum(&body));
        assert!(matches!(
            PixPayloadEncoder::new().decode(&payload),
            Err(PixError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_gui() {
        let body = "00020126330014br.gov.bcb.pay0111712884414795204000053039865802BR5903ABC6003XYZ62070503***6304";
        let payload = format!("{body}{}", checksum(body));
        assert!(matches!(
            PixPayloadEncoder::new().decode(&payload),
            Err(PixError::MalformedPayload(_))
        ));
    }
}
