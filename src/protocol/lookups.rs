//! Lookup enumerations used by the engine and tank PGNs.
//! Values follow the CANboat naming (`FLUID_TYPE`, `ENGINE_STATUS_1`,
//! `ENGINE_STATUS_2`); bit lookups carry the bit position as discriminant.

//==================================================================================FLUID_TYPE
/// Content of a tank reported by PGN 127505 (4-bit field).
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FluidType {
    #[default]
    Fuel = 0,
    Water = 1,
    GrayWater = 2,
    LiveWell = 3,
    Oil = 4,
    BlackWater = 5,
    FuelGasoline = 6,
    Error = 14,
    Unavailable = 15,
}

#[derive(Debug, PartialEq)]
pub struct InvalidFluidType(pub u8);

impl From<FluidType> for u8 {
    fn from(value: FluidType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for FluidType {
    type Error = InvalidFluidType;
    fn try_from(value: u8) -> Result<Self, InvalidFluidType> {
        match value {
            0 => Ok(Self::Fuel),
            1 => Ok(Self::Water),
            2 => Ok(Self::GrayWater),
            3 => Ok(Self::LiveWell),
            4 => Ok(Self::Oil),
            5 => Ok(Self::BlackWater),
            6 => Ok(Self::FuelGasoline),
            14 => Ok(Self::Error),
            15 => Ok(Self::Unavailable),
            _ => Err(InvalidFluidType(value)),
        }
    }
}

//==================================================================================ENGINE_STATUS_1
/// Bit positions of the first discrete status word of PGN 127489.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineStatus1 {
    CheckEngine = 0,
    OverTemperature = 1,
    LowOilPressure = 2,
    LowOilLevel = 3,
    LowFuelPressure = 4,
    LowSystemVoltage = 5,
    LowCoolantLevel = 6,
    WaterFlow = 7,
    WaterInFuel = 8,
    ChargeIndicator = 9,
    PreheatIndicator = 10,
    HighBoostPressure = 11,
    RevLimitExceeded = 12,
    EgrSystem = 13,
    ThrottlePositionSensor = 14,
    EmergencyStop = 15,
}

impl EngineStatus1 {
    /// Mask of this flag inside the status word.
    pub const fn mask(self) -> u16 {
        1 << self as u8
    }
}

//==================================================================================ENGINE_STATUS_2
/// Bit positions of the second discrete status word of PGN 127489.
/// Bits 8 to 15 are unused and always sent as zero.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineStatus2 {
    WarningLevel1 = 0,
    WarningLevel2 = 1,
    PowerReduction = 2,
    MaintenanceNeeded = 3,
    EngineCommError = 4,
    SubOrSecondaryThrottle = 5,
    NeutralStartProtect = 6,
    EngineShuttingDown = 7,
}

impl EngineStatus2 {
    pub const fn mask(self) -> u16 {
        1 << self as u8
    }
}
