#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Device {
    Cpu,
    Ppu,
}

/// An infallible memory-mapped device, used for everything that sits behind
/// the PPU address space and for peripheral registers on the CPU side.
///
/// Reads take `&self`, devices with read side effects (PPU status, controller
/// shift register) keep that state in `Cell`s.
pub trait Bus {
    fn read(&self, address: u16, device: Device) -> u8;
    fn write(&mut self, address: u16, data: u8, device: Device);
}

/// Generates an enum of memory mapped registers together with a lookup
/// from a (possibly mirrored) address.
///
/// `mask` is applied to the address before matching, so a register block
/// that repeats every 8 bytes can be declared once:
///
/// ```ignore
/// memory_mapped_registers! {
///     pub enum Register (mask 0x2007) {
///         Control = 0x2000,
///         Mask = 0x2001,
///     }
/// }
/// ```
#[macro_export]
macro_rules! memory_mapped_registers {
    ($vis:vis enum $name:ident (mask $mask:expr) {$($field:ident = $expr:expr,)*}) => {
        #[derive(Debug, PartialEq, Clone, Copy)]
        $vis enum $name {
            $($field = $expr,)*
        }

        impl $name {
            pub fn from_address(address: u16) -> Option<Self> {
                let address = address & $mask;
                match address {
                    $(x if x == $name::$field as u16 => Some($name::$field),)*
                    _ => None,
                }
            }
        }
    };

    ($vis:vis enum $name:ident {$($field:ident = $expr:expr,)*}) => {
        $crate::memory_mapped_registers! {$vis enum $name (mask 0xFFFF) {$($field = $expr,)*}}
    };
}
