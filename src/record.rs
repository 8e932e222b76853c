//! Audit records of accepted transitions
use super::status::OrderStatus;
use chrono::{DateTime, TimeZone, Utc};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

/// One accepted status change, as handed to the audit log.
#[derive(Debug, PartialEq, Eq, minicbor::Encode, minicbor::Decode, Clone)]
pub struct TransitionRecord {
    #[n(0)]
    pub order_id: String,
    #[n(1)]
    pub from: OrderStatus,
    #[n(2)]
    pub to: OrderStatus,
    #[n(3)]
    pub timestamp: TimeStamp<Utc>,
    #[n(4)]
    pub actor: String,
    #[n(5)]
    pub revision: u64, // order revision this transition produced
}

impl TransitionRecord {
    pub fn new(
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
        timestamp: TimeStamp<Utc>,
        actor: String,
        revision: u64,
    ) -> Self {
        Self {
            order_id,
            from,
            to,
            timestamp,
            actor,
            revision,
        }
    }
    /// CBOR encoding of the record and the sha256 digest of that encoding
    pub fn build(&self) -> anyhow::Result<(String, Vec<u8>)> {
        let cbor = minicbor::to_vec(self)?;
        let hash = sha256::digest(&cbor);

        Ok((hash, cbor))
    }
    /// "Delivered -> Return requested", for activity logs
    pub fn summary(&self) -> String {
        format!("{} -> {}", self.from.label(), self.to.label())
    }
}
