//! PTP code spaces
//!
//! Operations, responses, events, device properties and object formats each
//! live in their own 16-bit namespace. Devices routinely send codes nobody
//! has catalogued (vendors leave whole ranges unmapped), so every space is
//! open-ended: a value outside the known set decodes to `Unrecognized(raw)`
//! instead of failing.
//!
//! The high nibble of a code tells its space apart (`0x1` operations, `0x2`
//! responses, `0x3` formats, `0x4` events, `0x5` properties). Setting the top
//! bit moves a code into the vendor extension range of the same space.

use std::fmt;

/// Mask selecting the bits that identify a code's space
pub const CODE_SPACE_MASK: u16 = 0x7000;

/// Bit set on every vendor extension code
pub const VENDOR_EXTENSION_BIT: u16 = 0x8000;

macro_rules! code_space {
    (
        $(#[$meta:meta])*
        pub enum $name:ident (space = $space:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
            /// A code with no catalogued meaning, carrying the raw value
            Unrecognized(u16),
        }

        impl $name {
            /// Space bits (under [`CODE_SPACE_MASK`]) shared by every code
            /// of this kind
            pub const SPACE: u16 = $space;

            /// Raw wire value
            pub fn value(self) -> u16 {
                match self {
                    $(Self::$variant => $value,)*
                    Self::Unrecognized(raw) => raw,
                }
            }

            /// Check if the code has a catalogued meaning
            pub fn is_known(self) -> bool {
                !matches!(self, Self::Unrecognized(_))
            }

            /// Check if the code lies in this space's vendor extension range
            pub fn is_vendor_extension(self) -> bool {
                let raw = self.value();
                raw & VENDOR_EXTENSION_BIT != 0 && raw & CODE_SPACE_MASK == Self::SPACE
            }

            /// Check if a raw code belongs to this space (standard or vendor)
            pub fn in_space(raw: u16) -> bool {
                raw & CODE_SPACE_MASK == Self::SPACE
            }

            /// Catalogued name, or `None` for unrecognized codes
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $(Self::$variant => Some(stringify!($variant)),)*
                    Self::Unrecognized(_) => None,
                }
            }
        }

        impl From<u16> for $name {
            fn from(raw: u16) -> Self {
                match raw {
                    $($value => Self::$variant,)*
                    other => Self::Unrecognized(other),
                }
            }
        }

        impl From<$name> for u16 {
            fn from(code: $name) -> u16 {
                code.value()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => write!(f, "{}(0x{:04X})", name, self.value()),
                    None => write!(f, "Unrecognized(0x{:04X})", self.value()),
                }
            }
        }
    };
}

code_space! {
    /// Operation (command) codes
    pub enum CommandCode (space = 0x1000) {
        GetDeviceInfo = 0x1001,
        OpenSession = 0x1002,
        CloseSession = 0x1003,
        GetStorageIds = 0x1004,
        GetStorageInfo = 0x1005,
        GetNumObjects = 0x1006,
        GetObjectHandles = 0x1007,
        GetObjectInfo = 0x1008,
        GetObject = 0x1009,
        GetThumb = 0x100A,
        DeleteObject = 0x100B,
        SendObjectInfo = 0x100C,
        SendObject = 0x100D,
        InitiateCapture = 0x100E,
        FormatStore = 0x100F,
        ResetDevice = 0x1010,
        SelfTest = 0x1011,
        SetObjectProtection = 0x1012,
        PowerDown = 0x1013,
        GetDevicePropDesc = 0x1014,
        GetDevicePropValue = 0x1015,
        SetDevicePropValue = 0x1016,
        ResetDevicePropValue = 0x1017,
        TerminateOpenCapture = 0x1018,
        MoveObject = 0x1019,
        CopyObject = 0x101A,
        GetPartialObject = 0x101B,
        InitiateOpenCapture = 0x101C,

        // Sony SDIO extensions
        SdioConnect = 0x9201,
        SdioGetExtDeviceInfo = 0x9202,
        SonyGetDevicePropDesc = 0x9203,
        SonyGetDevicePropValue = 0x9204,
        SetControlDeviceA = 0x9205,
        GetControlDeviceDesc = 0x9206,
        SetControlDeviceB = 0x9207,
        GetAllDevicePropData = 0x9209,
        StartMovieRec = 0x920A,
        EndMovieRec = 0x920B,
        TerminateCapture = 0x920C,
        UnknownHandshakeRequest = 0x920D,

        // MTP object property extensions
        GetObjectPropsSupported = 0x9801,
        GetObjectPropDesc = 0x9802,
        GetObjectPropValue = 0x9803,
        GetObjectPropList = 0x9805,
    }
}

code_space! {
    /// Response codes
    pub enum ResponseCode (space = 0x2000) {
        Ok = 0x2001,
        GeneralError = 0x2002,
        SessionNotOpen = 0x2003,
        InvalidTransactionId = 0x2004,
        OperationNotSupported = 0x2005,
        ParameterNotSupported = 0x2006,
        IncompleteTransfer = 0x2007,
        InvalidStorageId = 0x2008,
        InvalidObjectHandle = 0x2009,
        DevicePropNotSupported = 0x200A,
        InvalidObjectFormatCode = 0x200B,
        StoreFull = 0x200C,
        ObjectWriteProtected = 0x200D,
        StoreReadOnly = 0x200E,
        AccessDenied = 0x200F,
        NoThumbnailPresent = 0x2010,
        SelfTestFailed = 0x2011,
        PartialDeletion = 0x2012,
        StoreNotAvailable = 0x2013,
        SpecificationByFormatUnsupported = 0x2014,
        NoValidObjectInfo = 0x2015,
        InvalidCodeFormat = 0x2016,
        UnknownVendorCode = 0x2017,
        CaptureAlreadyTerminated = 0x2018,
        DeviceBusy = 0x2019,
        InvalidParentObject = 0x201A,
        InvalidDevicePropFormat = 0x201B,
        InvalidDevicePropValue = 0x201C,
        InvalidParameter = 0x201D,
        SessionAlreadyOpen = 0x201E,
        TransactionCancelled = 0x201F,
        SpecificationOfDestinationUnsupported = 0x2020,
        InvalidEnumHandle = 0x2021,
        NoStreamEnabled = 0x2022,
        InvalidDataSet = 0x2023,

        // Eastman Kodak
        FilenameRequired = 0xA001,
        FilenameConflicts = 0xA002,
        FilenameInvalid = 0xA003,

        // Nikon
        InvalidStatus = 0xA004,
        SetPropertyNotSupported = 0xA005,
        WhiteBalanceResetError = 0xA006,
        DustReferenceError = 0xA007,
        ShutterSpeedBulb = 0xA008,
        MirrorUpSequence = 0xA009,
        CameraModeNotAdjustFNumber = 0xA00A,
        NotLiveView = 0xA00B,
        MfDriveStepEnd = 0xA00C,
        MfDriveStepInsufficiency = 0xA00E,
        AdvancedTransferCancel = 0xA022,
        NotReady = 0xA102,
        CannotMakeObject = 0xA104,
        MemoryStatusNotReady = 0xA106,

        // Sony
        AnotherSessionOpen = 0xA101,

        // MTP
        WfcSyntaxInvalid = 0xA121,
        WfcVersionNotSupported = 0xA122,
        InvalidMediaSessionId = 0xA170,
        MediaSessionLimitReached = 0xA171,
        NoMoreData = 0xA172,
        MtpUndefined = 0xA800,
        InvalidObjectPropCode = 0xA801,
        InvalidObjectPropFormat = 0xA802,
        InvalidObjectPropValue = 0xA803,
        InvalidObjectReference = 0xA804,
        MtpInvalidDataset = 0xA806,
        SpecificationByGroupUnsupported = 0xA807,
        SpecificationByDepthUnsupported = 0xA808,
        ObjectTooLarge = 0xA809,
        ObjectPropNotSupported = 0xA80A,
    }
}

code_space! {
    /// Object format codes
    pub enum FileFormat (space = 0x3000) {
        Undefined = 0x3000,
        Association = 0x3001,
        Script = 0x3002,
        Executable = 0x3003,
        Text = 0x3004,
        Html = 0x3005,
        Dpof = 0x3006,
        Aiff = 0x3007,
        Wav = 0x3008,
        Mp3 = 0x3009,
        Avi = 0x300A,
        Mpeg = 0x300B,
        Asf = 0x300C,
        QuickTime = 0x300D,
        DefinedImage = 0x3800,
        Jpeg = 0x3801,
        TiffEp = 0x3802,
        FlashPix = 0x3803,
        Bmp = 0x3804,
        Ciff = 0x3805,
        Gif = 0x3807,
        Jfif = 0x3808,
        Pcd = 0x3809,
        Pict = 0x380A,
        Png = 0x380B,
        Tiff = 0x380D,
        TiffIt = 0x380E,
        Jp2 = 0x380F,
        Jpx = 0x3810,
        Dng = 0x3811,

        // Vendor formats
        KodakM3u = 0xB002,
        SonyRaw = 0xB101,
        CanonCrw3 = 0xB103,
        CanonMov = 0xB104,
        CanonMov2 = 0xB105,
        CanonCr3 = 0xB108,
        CanonChdkCrw = 0xB1FF,
    }
}

code_space! {
    /// Event codes
    pub enum EventCode (space = 0x4000) {
        CancelTransaction = 0x4001,
        ObjectAdded = 0x4002,
        ObjectRemoved = 0x4003,
        StoreAdded = 0x4004,
        StoreRemoved = 0x4005,
        DevicePropChanged = 0x4006,
        ObjectInfoChanged = 0x4007,
        DeviceInfoChanged = 0x4008,
        RequestObjectTransfer = 0x4009,
        StoreFull = 0x400A,
        DeviceReset = 0x400B,
        StorageInfoChanged = 0x400C,
        CaptureComplete = 0x400D,
        UnreportedStatus = 0x400E,

        // Sony SDIO
        SonyObjectAdded = 0xC201,
        SonyObjectRemoved = 0xC202,
        SonyPropertyChanged = 0xC203,
    }
}

code_space! {
    /// Device property codes
    pub enum PropertyCode (space = 0x5000) {
        Undefined = 0x5000,
        BatteryLevel = 0x5001,
        FunctionalMode = 0x5002,
        ImageSize = 0x5003,
        CompressionSetting = 0x5004,
        WhiteBalance = 0x5005,
        RgbGain = 0x5006,
        FNumber = 0x5007,
        FocalLength = 0x5008,
        FocusDistance = 0x5009,
        FocusMode = 0x500A,
        ExposureMeteringMode = 0x500B,
        FlashMode = 0x500C,
        ExposureTime = 0x500D,
        ExposureProgramMode = 0x500E,
        ExposureIndex = 0x500F,
        ExposureBiasCompensation = 0x5010,
        DateTime = 0x5011,
        CaptureDelay = 0x5012,
        StillCaptureMode = 0x5013,
        Contrast = 0x5014,
        Sharpness = 0x5015,
        DigitalZoom = 0x5016,
        EffectMode = 0x5017,
        BurstNumber = 0x5018,
        BurstInterval = 0x5019,
        TimelapseNumber = 0x501A,
        TimelapseInterval = 0x501B,
        FocusMeteringMode = 0x501C,
        UploadUrl = 0x501D,
        Artist = 0x501E,
        CopyrightInfo = 0x501F,

        // Sony
        DpcCompensation = 0xD200,
        DRangeOptimize = 0xD201,
        SonyImageSize = 0xD203,
        ShutterSpeed = 0xD20D,
        ColorTemperature = 0xD20F,
        CcFilter = 0xD210,
        AspectRatio = 0xD211,
        FocusFound = 0xD213,
        ObjectInMemory = 0xD215,
        ExposeIndex = 0xD216,
        SonyBatteryLevel = 0xD218,
        PictureEffect = 0xD21B,
        AbFilter = 0xD21C,
        Iso = 0xD21E,
        RemainingShots = 0xD249,
        StillQuality = 0xD252,
        ZoomPosition = 0xD25D,
        AutoFocus = 0xD2C1,
        Capture = 0xD2C2,
        StillImage = 0xD2C7,
        Movie = 0xD2C8,
        PerformZoom = 0xD2DD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_codes() {
        assert_eq!(CommandCode::from(0x1001), CommandCode::GetDeviceInfo);
        assert_eq!(ResponseCode::from(0x2001), ResponseCode::Ok);
        assert_eq!(EventCode::from(0x4006), EventCode::DevicePropChanged);
        assert_eq!(PropertyCode::from(0x5007), PropertyCode::FNumber);
        assert_eq!(FileFormat::from(0x3801), FileFormat::Jpeg);
    }

    #[test]
    fn test_unrecognized_keeps_raw_value() {
        let code = ResponseCode::from(0x2FFF);
        assert_eq!(code, ResponseCode::Unrecognized(0x2FFF));
        assert!(!code.is_known());
        assert_eq!(u16::from(code), 0x2FFF);
        assert_eq!(code.name(), None);
    }

    #[test]
    fn test_value_conversion() {
        assert_eq!(u16::from(CommandCode::OpenSession), 0x1002);
        assert_eq!(PropertyCode::Iso.value(), 0xD21E);
        assert_eq!(EventCode::from(0xC203).value(), 0xC203);
    }

    #[test]
    fn test_vendor_extension_range() {
        assert!(CommandCode::SdioConnect.is_vendor_extension());
        assert!(!CommandCode::OpenSession.is_vendor_extension());
        assert!(ResponseCode::AnotherSessionOpen.is_vendor_extension());
        assert!(EventCode::SonyPropertyChanged.is_vendor_extension());
        assert!(PropertyCode::Unrecognized(0xD2FF).is_vendor_extension());
        assert!(FileFormat::SonyRaw.is_vendor_extension());

        // Vendor bit alone is not enough, the space must match
        assert!(!CommandCode::Unrecognized(0xD201).is_vendor_extension());
    }

    #[test]
    fn test_in_space() {
        assert!(CommandCode::in_space(0x9209));
        assert!(EventCode::in_space(0xC201));
        assert!(PropertyCode::in_space(0x5001));
        assert!(!PropertyCode::in_space(0x1001));
    }

    #[test]
    fn test_display() {
        assert_eq!(ResponseCode::Ok.to_string(), "Ok(0x2001)");
        assert_eq!(
            EventCode::Unrecognized(0xC2FF).to_string(),
            "Unrecognized(0xC2FF)"
        );
    }
}
