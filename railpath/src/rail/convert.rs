//! Conversion from reservation service DTOs to domain types.
//!
//! Rows that cannot be converted are skipped with a warning rather than
//! failing the whole query.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::domain::{
    SeatType, Station, StationCode, Ticket, TicketStatus, TrainId, TrainRun, parse_clock_time,
    parse_compact_date,
};
use crate::planner::{RouteRequest, StopEntry};
use crate::stations::StationDirectory;

use super::types::{StopDto, TrainDto, TrainRow};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a station telecode
    #[error("invalid station code: {0}")]
    InvalidCode(String),

    /// Telecode not present in the station directory
    #[error("unknown station code: {0}")]
    UnknownStation(String),

    /// Failed to parse a time or date string
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Failed to parse the duration field
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// The packed seat counts are malformed
    #[error("invalid seat counts: {0}")]
    InvalidSeatCounts(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Width of one entry in the packed seat counts.
const SEAT_ENTRY_LEN: usize = 10;

/// Counts at or above this belong to the no-seat class, offset by it.
const NO_SEAT_OFFSET: u32 = 3000;

/// Convert the rows of a direct-route query into train runs.
///
/// Rows that fail to convert are logged and dropped. When the request asks
/// for an exact origin or destination, runs serving a different station of
/// the same city are dropped too.
pub fn convert_query(
    rows: &[TrainRow],
    request: &RouteRequest,
    directory: &StationDirectory,
) -> Vec<TrainRun> {
    rows.iter()
        .filter_map(
            |row| match convert_train(&row.train, request.date, directory) {
                Ok(run) => Some(run),
                Err(e) => {
                    warn!(train = %row.train.station_train_code, error = %e, "Skipping train");
                    None
                }
            },
        )
        .filter(|run| !request.exact_origin || run.departure_station == request.origin)
        .filter(|run| {
            !request.exact_destination || run.destination_station == request.destination
        })
        .collect()
}

/// Convert a single train row.
///
/// `query_date` is the date the run was queried on; the departure clock
/// time is anchored to it.
pub fn convert_train(
    dto: &TrainDto,
    query_date: NaiveDate,
    directory: &StationDirectory,
) -> Result<TrainRun, ConversionError> {
    let id = TrainId::new(dto.train_no.clone())
        .map_err(|_| ConversionError::MissingField("train_no"))?;

    if dto.station_train_code.is_empty() {
        return Err(ConversionError::MissingField("station_train_code"));
    }

    let departure_station = lookup(&dto.from_station_telecode, directory)?;
    let destination_station = lookup(&dto.to_station_telecode, directory)?;

    let departure_time = parse_clock_time(&dto.start_time, query_date)
        .map_err(|_| ConversionError::InvalidTime(dto.start_time.clone()))?;

    let duration = dto
        .duration_mins
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|&minutes| minutes >= 0)
        .and_then(Duration::try_minutes)
        .ok_or_else(|| ConversionError::InvalidDuration(dto.duration_mins.clone()))?;

    let schedule_date = parse_compact_date(&dto.start_train_date)
        .map_err(|_| ConversionError::InvalidTime(dto.start_train_date.clone()))?;

    Ok(TrainRun {
        id,
        name: dto.station_train_code.clone(),
        departure_station,
        destination_station,
        departure_time,
        duration,
        schedule_date,
        purchasable: dto.can_web_buy.as_deref() == Some("Y"),
        tickets: convert_tickets(dto)?,
    })
}

/// Seat classes the row reports, with their remaining counts.
///
/// Classes marked `--` (or missing) are left out.
pub fn convert_tickets(dto: &TrainDto) -> Result<Vec<Ticket>, ConversionError> {
    let counts = parse_seat_counts(dto.yp_info.as_deref().unwrap_or_default())?;

    Ok(SeatType::ALL
        .into_iter()
        .filter_map(|seat| {
            let status = TicketStatus::from_text(dto.seat_text(seat).unwrap_or_default());
            let count = match status {
                TicketStatus::NotApplicable => return None,
                TicketStatus::Available => counts.get(&seat).copied().unwrap_or(0),
                TicketStatus::NotYetSold | TicketStatus::SoldOut => 0,
            };
            Some(Ticket {
                seat,
                status,
                count,
            })
        })
        .collect())
}

/// Decode the packed seat counts (`yp_info`).
///
/// Each ten-character entry starts with a seat class code and ends with a
/// four-digit count. Counts of 3000 and up are no-seat tickets. Entries with
/// an unknown class code are ignored.
pub fn parse_seat_counts(packed: &str) -> Result<HashMap<SeatType, u32>, ConversionError> {
    let bytes = packed.trim().as_bytes();
    if bytes.len() % SEAT_ENTRY_LEN != 0 {
        return Err(ConversionError::InvalidSeatCounts(packed.to_string()));
    }

    let mut counts = HashMap::new();
    for entry in bytes.chunks(SEAT_ENTRY_LEN) {
        let count = std::str::from_utf8(&entry[6..])
            .ok()
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u32>().ok())
            .ok_or_else(|| ConversionError::InvalidSeatCounts(packed.to_string()))?;

        if count >= NO_SEAT_OFFSET {
            counts.insert(SeatType::NoSeat, count - NO_SEAT_OFFSET);
        } else if let Some(seat) = SeatType::from_code(entry[0]) {
            counts.insert(seat, count);
        } else {
            debug!(code = %char::from(entry[0]), "Ignoring unknown seat class");
        }
    }
    Ok(counts)
}

fn lookup(code: &str, directory: &StationDirectory) -> Result<Station, ConversionError> {
    let code =
        StationCode::parse(code).map_err(|_| ConversionError::InvalidCode(code.to_string()))?;
    directory
        .by_code(code)
        .map_err(|_| ConversionError::UnknownStation(code.to_string()))
}

/// Convert a train's full stop list.
pub fn convert_stop_list(stops: &[StopDto]) -> Vec<StopEntry> {
    stops
        .iter()
        .map(|stop| StopEntry {
            station_name: stop.station_name.clone(),
            on_path: stop.is_enabled,
        })
        .collect()
}
