//! Reservation service response DTOs.
//!
//! These types map directly to the JSON returned by the direct-route query
//! and stop-list endpoints. Fields the planner never reads are left out.

use serde::Deserialize;

use crate::domain::SeatType;

/// Common response envelope.
///
/// `status` is `true` on success. On failure `messages` carries the
/// server's explanation and `data` is usually absent.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: bool,

    #[serde(default)]
    pub messages: Vec<String>,

    pub data: Option<T>,
}

/// One row of a direct-route query result.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainRow {
    #[serde(rename = "queryLeftNewDTO")]
    pub train: TrainDto,

    /// Purchase token; expires a few minutes after the query.
    #[serde(rename = "secretStr", default)]
    pub secret: Option<String>,
}

/// Train details within a query row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainDto {
    /// Internal schedule id (e.g. "5l000D220200").
    pub train_no: String,

    /// User-facing train name (e.g. "D2202").
    pub station_train_code: String,

    /// Telecode of the station this run departs from.
    pub from_station_telecode: String,

    /// Telecode of the station this run arrives at.
    pub to_station_telecode: String,

    /// Departure clock time, "HH:MM".
    pub start_time: String,

    /// Journey length in minutes, as a string.
    #[serde(rename = "lishiValue")]
    pub duration_mins: String,

    /// Schedule start date, "YYYYMMDD". Not always the queried date.
    pub start_train_date: String,

    /// "Y" when tickets can be bought online.
    #[serde(rename = "canWebBuy", default)]
    pub can_web_buy: Option<String>,

    /// Packed seat counts: ten characters per class, a class code first and
    /// the count in the last four.
    #[serde(default)]
    pub yp_info: Option<String>,

    // Per-class sale text: "--", "*", "无", "有" or a count.
    #[serde(default)]
    pub swz_num: Option<String>,
    #[serde(default)]
    pub tz_num: Option<String>,
    #[serde(default)]
    pub zy_num: Option<String>,
    #[serde(default)]
    pub ze_num: Option<String>,
    #[serde(default)]
    pub gr_num: Option<String>,
    #[serde(default)]
    pub rw_num: Option<String>,
    #[serde(default)]
    pub yw_num: Option<String>,
    #[serde(default)]
    pub rz_num: Option<String>,
    #[serde(default)]
    pub yz_num: Option<String>,
    #[serde(default)]
    pub wz_num: Option<String>,
    #[serde(default)]
    pub qt_num: Option<String>,
}

impl TrainDto {
    /// Sale text for one seat class, if the row carries it.
    pub fn seat_text(&self, seat: SeatType) -> Option<&str> {
        let text = match seat {
            SeatType::Business => &self.swz_num,
            SeatType::Special => &self.tz_num,
            SeatType::FirstClass => &self.zy_num,
            SeatType::SecondClass => &self.ze_num,
            SeatType::SoftSleeperPro => &self.gr_num,
            SeatType::SoftSleeper => &self.rw_num,
            SeatType::HardSleeper => &self.yw_num,
            SeatType::SoftSeat => &self.rz_num,
            SeatType::HardSeat => &self.yz_num,
            SeatType::NoSeat => &self.wz_num,
            SeatType::Other => &self.qt_num,
        };
        text.as_deref()
    }
}

/// Payload of the stop-list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StopListData {
    pub data: Vec<StopDto>,
}

/// One stop on a train's full route.
#[derive(Debug, Clone, Deserialize)]
pub struct StopDto {
    pub station_name: String,

    /// Whether the stop lies within the queried departure→destination span.
    #[serde(rename = "isEnabled")]
    pub is_enabled: bool,

    #[serde(default)]
    pub station_no: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_query_envelope() {
        let json = r#"{
            "validateMessagesShowId": "_validatorMessage",
            "status": true,
            "httpstatus": 200,
            "data": [
                {
                    "queryLeftNewDTO": {
                        "train_no": "5l000D220200",
                        "station_train_code": "D2202",
                        "from_station_telecode": "NJH",
                        "to_station_telecode": "SHH",
                        "start_time": "07:05",
                        "arrive_time": "08:20",
                        "lishiValue": "75",
                        "start_train_date": "20140526",
                        "canWebBuy": "Y"
                    },
                    "secretStr": "MjAxNC0wNS0yNiMwMCNEMjIwMg",
                    "buttonTextInfo": "预订"
                }
            ],
            "messages": [],
            "validateMessages": {}
        }"#;

        let envelope: Envelope<Vec<TrainRow>> = serde_json::from_str(json).unwrap();
        assert!(envelope.status);
        let rows = envelope.data.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].train.station_train_code, "D2202");
        assert_eq!(rows[0].train.duration_mins, "75");
        assert_eq!(rows[0].train.can_web_buy.as_deref(), Some("Y"));
        assert!(rows[0].secret.is_some());
        assert!(rows[0].train.yp_info.is_none());
    }

    #[test]
    fn deserialize_seat_fields() {
        let json = r#"{
            "train_no": "5l000D220200",
            "station_train_code": "D2202",
            "from_station_telecode": "NJH",
            "to_station_telecode": "SHH",
            "start_time": "07:05",
            "lishiValue": "75",
            "start_train_date": "20140526",
            "yp_info": "O055300034M093300009",
            "ze_num": "有",
            "zy_num": "无",
            "wz_num": "--"
        }"#;

        let dto: TrainDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.seat_text(SeatType::SecondClass), Some("有"));
        assert_eq!(dto.seat_text(SeatType::FirstClass), Some("无"));
        assert_eq!(dto.seat_text(SeatType::NoSeat), Some("--"));
        assert_eq!(dto.seat_text(SeatType::HardSleeper), None);
        assert_eq!(dto.yp_info.as_deref(), Some("O055300034M093300009"));
    }

    #[test]
    fn deserialize_failure_envelope() {
        let json = r#"{"status": false, "messages": ["选择的查询日期不在预售日期范围内"]}"#;
        let envelope: Envelope<Vec<TrainRow>> = serde_json::from_str(json).unwrap();
        assert!(!envelope.status);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.messages.len(), 1);
    }

    #[test]
    fn deserialize_stop_list() {
        let json = r#"{
            "status": true,
            "data": {
                "data": [
                    {"station_no": "01", "station_name": "北京南", "isEnabled": false},
                    {"station_no": "02", "station_name": "南京南", "isEnabled": true},
                    {"station_no": "03", "station_name": "上海虹桥", "isEnabled": true}
                ]
            }
        }"#;

        let envelope: Envelope<StopListData> = serde_json::from_str(json).unwrap();
        let stops = envelope.data.unwrap().data;
        assert_eq!(stops.len(), 3);
        assert!(!stops[0].is_enabled);
        assert_eq!(stops[2].station_name, "上海虹桥");
    }
}
