use serde::{Deserialize, Serialize};

/// Candle timeframe the analysis was run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[default]
    #[serde(rename = "1hour")]
    OneHour,
    #[serde(rename = "4hour")]
    FourHours,
    #[serde(rename = "1day")]
    OneDay,
    #[serde(rename = "1week")]
    OneWeek,
}

impl Timeframe {
    pub const ALL: [Timeframe; 8] = [
        Timeframe::OneMinute,
        Timeframe::FiveMinutes,
        Timeframe::FifteenMinutes,
        Timeframe::ThirtyMinutes,
        Timeframe::OneHour,
        Timeframe::FourHours,
        Timeframe::OneDay,
        Timeframe::OneWeek,
    ];

    /// Get the timeframe from its identifier.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1min" => Some(Timeframe::OneMinute),
            "5min" => Some(Timeframe::FiveMinutes),
            "15min" => Some(Timeframe::FifteenMinutes),
            "30min" => Some(Timeframe::ThirtyMinutes),
            "1hour" => Some(Timeframe::OneHour),
            "4hour" => Some(Timeframe::FourHours),
            "1day" => Some(Timeframe::OneDay),
            "1week" => Some(Timeframe::OneWeek),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1min",
            Timeframe::FiveMinutes => "5min",
            Timeframe::FifteenMinutes => "15min",
            Timeframe::ThirtyMinutes => "30min",
            Timeframe::OneHour => "1hour",
            Timeframe::FourHours => "4hour",
            Timeframe::OneDay => "1day",
            Timeframe::OneWeek => "1week",
        }
    }

    /// Presentation context for this timeframe.
    pub fn context(&self) -> TimeframeContext {
        match self {
            Timeframe::OneMinute => TimeframeContext {
                timeframe: *self,
                display_name: "1 Minute",
                style: TradeStyle::Scalping,
                tp_range: PctRange::new(0.1, 0.3),
                sl_range: PctRange::new(0.05, 0.15),
                hold_time: "1-15 minutes",
                volatility: "Very High",
                reliability: "Low",
                rr_ratio: "1:1.5",
            },
            Timeframe::FiveMinutes => TimeframeContext {
                timeframe: *self,
                display_name: "5 Minutes",
                style: TradeStyle::Scalping,
                tp_range: PctRange::new(0.2, 0.5),
                sl_range: PctRange::new(0.1, 0.25),
                hold_time: "15-60 minutes",
                volatility: "High",
                reliability: "Low-Medium",
                rr_ratio: "1:1.5",
            },
            Timeframe::FifteenMinutes => TimeframeContext {
                timeframe: *self,
                display_name: "15 Minutes",
                style: TradeStyle::Intraday,
                tp_range: PctRange::new(0.3, 0.8),
                sl_range: PctRange::new(0.15, 0.4),
                hold_time: "1-4 hours",
                volatility: "Medium-High",
                reliability: "Medium",
                rr_ratio: "1:2",
            },
            Timeframe::ThirtyMinutes => TimeframeContext {
                timeframe: *self,
                display_name: "30 Minutes",
                style: TradeStyle::Intraday,
                tp_range: PctRange::new(0.5, 1.2),
                sl_range: PctRange::new(0.25, 0.6),
                hold_time: "2-8 hours",
                volatility: "Medium",
                reliability: "Medium",
                rr_ratio: "1:2",
            },
            Timeframe::OneHour => TimeframeContext {
                timeframe: *self,
                display_name: "1 Hour",
                style: TradeStyle::Intraday,
                tp_range: PctRange::new(0.8, 2.0),
                sl_range: PctRange::new(0.4, 1.0),
                hold_time: "4-24 hours",
                volatility: "Medium",
                reliability: "Medium-High",
                rr_ratio: "1:2",
            },
            Timeframe::FourHours => TimeframeContext {
                timeframe: *self,
                display_name: "4 Hours",
                style: TradeStyle::Swing,
                tp_range: PctRange::new(1.5, 4.0),
                sl_range: PctRange::new(0.8, 2.0),
                hold_time: "1-5 days",
                volatility: "Medium-Low",
                reliability: "High",
                rr_ratio: "1:2.5",
            },
            Timeframe::OneDay => TimeframeContext {
                timeframe: *self,
                display_name: "1 Day",
                style: TradeStyle::Swing,
                tp_range: PctRange::new(3.0, 8.0),
                sl_range: PctRange::new(1.5, 4.0),
                hold_time: "1-4 weeks",
                volatility: "Low",
                reliability: "High",
                rr_ratio: "1:2.5",
            },
            Timeframe::OneWeek => TimeframeContext {
                timeframe: *self,
                display_name: "1 Week",
                style: TradeStyle::Position,
                tp_range: PctRange::new(5.0, 15.0),
                sl_range: PctRange::new(3.0, 7.0),
                hold_time: "1-6 months",
                volatility: "Very Low",
                reliability: "Very High",
                rr_ratio: "1:3",
            },
        }
    }
}

/// Trading style a timeframe is suited for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStyle {
    Scalping,
    Intraday,
    Swing,
    Position,
}

impl TradeStyle {
    pub fn name(&self) -> &'static str {
        match self {
            TradeStyle::Scalping => "Scalping",
            TradeStyle::Intraday => "Intraday",
            TradeStyle::Swing => "Swing Trading",
            TradeStyle::Position => "Position Trading",
        }
    }
}

/// Percentage range, e.g. 0.8% - 2.0%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PctRange {
    pub min: f64,
    pub max: f64,
}

impl PctRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn label(&self) -> String {
        format!("{}% - {}%", self.min, self.max)
    }
}

/// Expected profit/stop ranges, holding period and reliability for a timeframe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeframeContext {
    pub timeframe: Timeframe,
    pub display_name: &'static str,
    #[serde(rename = "type")]
    pub style: TradeStyle,
    pub tp_range: PctRange,
    pub sl_range: PctRange,
    pub hold_time: &'static str,
    pub volatility: &'static str,
    pub reliability: &'static str,
    pub rr_ratio: &'static str,
}

/// Look up the context for a timeframe identifier. Unknown identifiers use `1hour`.
pub fn context_for(timeframe_id: &str) -> TimeframeContext {
    Timeframe::from_str(timeframe_id)
        .unwrap_or_default()
        .context()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_id_round_trip() {
        for tf in Timeframe::ALL {
            assert_eq!(Timeframe::from_str(tf.id()), Some(tf));
        }
    }

    #[test]
    fn test_unknown_timeframe_falls_back_to_one_hour() {
        let ctx = context_for("3day");
        assert_eq!(ctx.timeframe, Timeframe::OneHour);
        assert_eq!(ctx, context_for("1hour"));
    }

    #[test]
    fn test_ranges_widen_with_timeframe() {
        let mut prev_tp = 0.0;
        for tf in Timeframe::ALL {
            let ctx = tf.context();
            assert!(ctx.tp_range.min < ctx.tp_range.max);
            assert!(ctx.sl_range.min < ctx.sl_range.max);
            assert!(ctx.sl_range.max <= ctx.tp_range.max);
            assert!(ctx.tp_range.max > prev_tp);
            prev_tp = ctx.tp_range.max;
        }
    }

    #[test]
    fn test_context_serialization() {
        let json = serde_json::to_value(context_for("4hour")).unwrap();
        assert_eq!(json["timeframe"], "4hour");
        assert_eq!(json["type"], "swing");
        assert_eq!(json["display_name"], "4 Hours");
        assert_eq!(json["tp_range"]["min"], 1.5);
    }

    #[test]
    fn test_pct_range_label() {
        assert_eq!(PctRange::new(0.8, 2.0).label(), "0.8% - 2%");
        assert!((PctRange::new(0.8, 2.0).midpoint() - 1.4).abs() < 1e-12);
    }
}
