//! 공조 프로세스와 AHU/FCU 시스템 모델을 모아둔다.

pub mod processes;
pub mod systems;

pub use processes::{
    adiabatic_humidify, coil_load, cooling_coil, cp_moist_air, mix_air, sensible_heat,
    steam_humidify, CoilLoad, ProcessError,
};
pub use systems::{
    AhuCoolingInput, AhuHeatingInput, AhuModel, AhuSlot, FcuModel, FcuSlot, Humidifier,
    SystemError,
};
