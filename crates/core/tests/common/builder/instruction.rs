//! Instruction word encoders for building test stimulus.

/// MIPS32 encoders.
pub mod mips {
    /// SPECIAL function codes as decoded by the core.
    pub mod funct {
        pub const ADD: u32 = 0x20;
        pub const SUB: u32 = 0x22;
        pub const SLL: u32 = 0x0F;
        pub const SLT: u32 = 0x2A;
        pub const SLTU: u32 = 0x2B;
        pub const XOR: u32 = 0x26;
        pub const SRL: u32 = 0x02;
        pub const SRA: u32 = 0x03;
        pub const OR: u32 = 0x25;
        pub const AND: u32 = 0x24;
    }

    pub const OP_J: u32 = 2;
    pub const OP_JAL: u32 = 3;
    pub const OP_SB: u32 = 0o50;
    pub const OP_SH: u32 = 0o51;
    pub const OP_SW: u32 = 0o53;

    /// Register form: `op = 0`.
    pub fn r_type(funct: u32, rd: u32, rs: u32, rt: u32) -> u32 {
        (rs & 0x1F) << 21 | (rt & 0x1F) << 16 | (rd & 0x1F) << 11 | (funct & 0x3F)
    }

    /// Store form with a 16-bit signed offset.
    pub fn store(op: u32, base: u32, data: u32, offset: i16) -> u32 {
        (op & 0x3F) << 26 | (base & 0x1F) << 21 | (data & 0x1F) << 16 | (offset as u16 as u32)
    }

    /// Jump form with a 26-bit word index.
    pub fn jump(op: u32, index: u32) -> u32 {
        (op & 0x3F) << 26 | (index & 0x03FF_FFFF)
    }

    pub fn add(rd: u32, rs: u32, rt: u32) -> u32 {
        r_type(funct::ADD, rd, rs, rt)
    }

    pub fn sub(rd: u32, rs: u32, rt: u32) -> u32 {
        r_type(funct::SUB, rd, rs, rt)
    }

    pub fn sw(base: u32, data: u32, offset: i16) -> u32 {
        store(OP_SW, base, data, offset)
    }

    /// `jal` to byte address `target` (low 28 bits).
    pub fn jal(target: u32) -> u32 {
        jump(OP_JAL, (target & 0x0FFF_FFFF) >> 2)
    }
}

/// RV32I encoders.
pub mod rv32 {
    pub const OP_REG: u32 = 0b0110011;
    pub const OP_STORE: u32 = 0b0100011;
    pub const OP_JAL: u32 = 0b1101111;

    /// Encode an R-type instruction.
    pub fn r_type(rd: u32, funct3: u32, rs1: u32, rs2: u32, funct7: u32) -> u32 {
        (funct7 & 0x7F) << 25
            | (rs2 & 0x1F) << 20
            | (rs1 & 0x1F) << 15
            | (funct3 & 0x7) << 12
            | (rd & 0x1F) << 7
            | OP_REG
    }

    /// Encode an S-type instruction.
    pub fn s_type(funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
        let v = imm as u32;
        let hi = (v >> 5) & 0x7F;
        let lo = v & 0x1F;
        hi << 25 | (rs2 & 0x1F) << 20 | (rs1 & 0x1F) << 15 | (funct3 & 0x7) << 12 | lo << 7 | OP_STORE
    }

    /// Encode a J-type `jal`.
    pub fn jal(rd: u32, imm: i32) -> u32 {
        let v = imm as u32;
        let bit20 = (v >> 20) & 1;
        let bits10_1 = (v >> 1) & 0x3FF;
        let bit11 = (v >> 11) & 1;
        let bits19_12 = (v >> 12) & 0xFF;
        bit20 << 31 | bits10_1 << 21 | bit11 << 20 | bits19_12 << 12 | (rd & 0x1F) << 7 | OP_JAL
    }

    pub fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
        r_type(rd, 0, rs1, rs2, 0)
    }

    pub fn sub(rd: u32, rs1: u32, rs2: u32) -> u32 {
        r_type(rd, 0, rs1, rs2, 0b0100000)
    }

    pub fn sw(rs1: u32, rs2: u32, imm: i32) -> u32 {
        s_type(2, rs1, rs2, imm)
    }
}
