//! Session control packets. Every packet is one 8 byte feature report.

pub const REPORT_ID: u8 = 5;
pub const REPORT_LEN: usize = 8;
const CONTROL: u8 = 0xFE;

macro_rules! impl_control_abi {
    [$(
        $( #[doc = $doc:literal] )*
        fn $name:ident ( [ $( $byte:expr ),* ] );
    )+] => {
        $(
            $( #[doc = $doc] )*
            pub const fn $name() -> [u8; REPORT_LEN] {
                let args: &[u8] = &[$( $byte ),*];
                let mut buf = [0u8; REPORT_LEN];
                buf[0] = REPORT_ID;
                buf[1] = CONTROL;
                let mut i = 0;
                while i < args.len() {
                    buf[2 + i] = args[i];
                    i += 1;
                }
                buf
            }
        )+
    };
}

impl_control_abi![
    /// Switch the keyboard to host controlled lighting
    fn session_start([0x0C, 0x0F]);

    /// Hand lighting back to the firmware
    fn session_end([0x01, 0x0F]);
];
