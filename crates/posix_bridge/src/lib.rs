use std::fmt;

use civil_time::{CivilDateTime, to_unix_timestamp};
pub use civil_time::{InvalidDateTime, UtcOffset};
use tokio::sync::{mpsc, oneshot};

/// The five fields the collaborating UI collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertRequest {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    InvalidDateTime(InvalidDateTime),
    Disconnected,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::InvalidDateTime(err) => err.fmt(f),
            BridgeError::Disconnected => write!(f, "converter service is gone"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<InvalidDateTime> for BridgeError {
    fn from(err: InvalidDateTime) -> BridgeError {
        BridgeError::InvalidDateTime(err)
    }
}

/// Synchronous entry point: validation, then arithmetic. The async plumbing
/// below only carries this call's inputs and outputs.
pub fn convert_request(request: ConvertRequest, offset: UtcOffset) -> Result<i64, InvalidDateTime> {
    let datetime = CivilDateTime::new(
        request.year,
        request.month,
        request.day,
        request.hour,
        request.minute,
    )?;
    to_unix_timestamp(datetime, offset)
}

struct Envelope {
    request: ConvertRequest,
    reply: oneshot::Sender<Result<i64, InvalidDateTime>>,
}

#[derive(Clone)]
pub struct ConverterHandle {
    requests: mpsc::Sender<Envelope>,
}

pub struct ConverterService {
    requests: mpsc::Receiver<Envelope>,
    offset: UtcOffset,
}

pub fn channel(capacity: usize, offset: UtcOffset) -> (ConverterHandle, ConverterService) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        ConverterHandle { requests: tx },
        ConverterService {
            requests: rx,
            offset,
        },
    )
}

/// Runs a service on the current tokio runtime and returns its handle.
/// Panics outside a runtime.
pub fn spawn(offset: UtcOffset) -> ConverterHandle {
    let (handle, service) = channel(32, offset);
    tokio::spawn(service.run());
    handle
}

impl ConverterHandle {
    pub async fn convert(&self, request: ConvertRequest) -> Result<i64, BridgeError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Envelope { request, reply })
            .await
            .map_err(|_| BridgeError::Disconnected)?;
        response
            .await
            .map_err(|_| BridgeError::Disconnected)?
            .map_err(BridgeError::from)
    }
}

impl ConverterService {
    /// Answers requests until every handle is dropped.
    pub async fn run(mut self) {
        while let Some(Envelope { request, reply }) = self.requests.recv().await {
            // The requester may have given up; nothing to do then.
            let _ = reply.send(convert_request(request, self.offset));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(year: i64, month: u32, day: u32, hour: u32, minute: u32) -> ConvertRequest {
        ConvertRequest {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    #[tokio::test]
    async fn test_convert_epoch() {
        let converter = spawn(UtcOffset::UTC);
        let timestamp = converter
            .convert(request(1970, 1, 1, 0, 0))
            .await
            .expect("Failed to convert");
        assert_eq!(timestamp, 0);
    }

    #[tokio::test]
    async fn test_invalid_request_is_reported() {
        let converter = spawn(UtcOffset::UTC);
        assert_eq!(
            converter.convert(request(2023, 13, 1, 0, 0)).await,
            Err(BridgeError::InvalidDateTime(
                InvalidDateTime::MonthOutOfRange(13)
            ))
        );
        assert_eq!(
            converter.convert(request(1900, 2, 29, 0, 0)).await,
            Err(BridgeError::InvalidDateTime(InvalidDateTime::DayOutOfRange(
                29
            )))
        );
    }

    #[tokio::test]
    async fn test_offset_is_applied() {
        let converter = spawn(UtcOffset::from_seconds(3_600));
        assert_eq!(converter.convert(request(1970, 1, 1, 0, 0)).await, Ok(-3_600));
    }

    #[tokio::test]
    async fn test_concurrent_handles() {
        let converter = spawn(UtcOffset::UTC);

        let tasks: Vec<_> = (0u32..16)
            .map(|minute| {
                let converter = converter.clone();
                tokio::spawn(async move {
                    converter.convert(request(1970, 1, 1, 0, minute)).await
                })
            })
            .collect();

        for (minute, task) in tasks.into_iter().enumerate() {
            let result = task.await.expect("Failed to join task");
            assert_eq!(result, Ok(minute as i64 * 60));
        }
    }

    #[tokio::test]
    async fn test_dropped_service_disconnects() {
        let (converter, service) = channel(1, UtcOffset::UTC);
        drop(service);
        assert_eq!(
            converter.convert(request(1970, 1, 1, 0, 0)).await,
            Err(BridgeError::Disconnected)
        );
    }
}
