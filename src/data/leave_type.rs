use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of absence categories an agency records.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveType {
    AnnualLeave,
    SickLeave,
    PublicHoliday,
    UnpaidLeave,
    MaternityLeave,
    PaternityLeave,
    BereavementLeave,
    EmergencyLeave,
    MedicalAppointment,
    TimeOffInLieu,
}

impl LeaveType {
    pub const ALL: [LeaveType; 10] = [
        LeaveType::AnnualLeave,
        LeaveType::SickLeave,
        LeaveType::PublicHoliday,
        LeaveType::UnpaidLeave,
        LeaveType::MaternityLeave,
        LeaveType::PaternityLeave,
        LeaveType::BereavementLeave,
        LeaveType::EmergencyLeave,
        LeaveType::MedicalAppointment,
        LeaveType::TimeOffInLieu,
    ];

    /// Wire code, identical to the serialized form.
    pub fn code(self) -> &'static str {
        match self {
            LeaveType::AnnualLeave => "ANNUAL_LEAVE",
            LeaveType::SickLeave => "SICK_LEAVE",
            LeaveType::PublicHoliday => "PUBLIC_HOLIDAY",
            LeaveType::UnpaidLeave => "UNPAID_LEAVE",
            LeaveType::MaternityLeave => "MATERNITY_LEAVE",
            LeaveType::PaternityLeave => "PATERNITY_LEAVE",
            LeaveType::BereavementLeave => "BEREAVEMENT_LEAVE",
            LeaveType::EmergencyLeave => "EMERGENCY_LEAVE",
            LeaveType::MedicalAppointment => "MEDICAL_APPOINTMENT",
            LeaveType::TimeOffInLieu => "TIME_OFF_IN_LIEU",
        }
    }

    /// Display color bound to the category. Adding a variant without a color
    /// does not compile.
    pub fn color(self) -> &'static str {
        match self {
            LeaveType::AnnualLeave => "#4CAF50",
            LeaveType::SickLeave => "#F44336",
            LeaveType::PublicHoliday => "#2196F3",
            LeaveType::UnpaidLeave => "#9E9E9E",
            LeaveType::MaternityLeave => "#E91E63",
            LeaveType::PaternityLeave => "#3F51B5",
            LeaveType::BereavementLeave => "#607D8B",
            LeaveType::EmergencyLeave => "#FF9800",
            LeaveType::MedicalAppointment => "#00BCD4",
            LeaveType::TimeOffInLieu => "#9C27B0",
        }
    }

    /// Title used for calendar entries: the code with every underscore
    /// turned into a space.
    pub fn label(self) -> String {
        self.code().replace('_', " ")
    }

    /// Next category in `ALL`, wrapping around.
    pub fn next(self) -> LeaveType {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous category in `ALL`, wrapping around.
    pub fn prev(self) -> LeaveType {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LeaveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace([' ', '-'], "_").to_uppercase();
        LeaveType::ALL
            .into_iter()
            .find(|t| t.code() == wanted)
            .ok_or_else(|| format!("Invalid leave type: {}", s))
    }
}
