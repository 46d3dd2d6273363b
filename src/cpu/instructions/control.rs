use crate::cpu::Cpu;
use crate::mmu::Memory;
use crate::opcodes::Condition;

impl Cpu {
    fn taken(&self, cc: Option<Condition>) -> bool {
        cc.is_none_or(|cc| self.condition(cc))
    }

    pub(crate) fn jp(&mut self, nn: u16, cc: Option<Condition>) -> u32 {
        if !self.taken(cc) {
            return 12;
        }
        self.regs.pc = nn;
        16
    }

    pub(crate) fn jp_hl(&mut self) -> u32 {
        self.regs.pc = self.regs.hl();
        4
    }

    /// Offset is relative to the address after the 2-byte encoding.
    pub(crate) fn jr(&mut self, offset: i8, cc: Option<Condition>) -> u32 {
        if !self.taken(cc) {
            return 8;
        }
        self.regs.pc = self.regs.pc.wrapping_add_signed(offset as i16);
        12
    }

    pub(crate) fn call(&mut self, nn: u16, cc: Option<Condition>, bus: &mut impl Memory) -> u32 {
        if !self.taken(cc) {
            return 12;
        }
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = nn;
        24
    }

    pub(crate) fn rst(&mut self, vector: u16, bus: &mut impl Memory) -> u32 {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = vector;
        16
    }

    pub(crate) fn ret(&mut self, bus: &mut impl Memory) -> u32 {
        self.regs.pc = self.pop_u16(bus);
        16
    }

    pub(crate) fn ret_cond(&mut self, cc: Condition, bus: &mut impl Memory) -> u32 {
        if !self.condition(cc) {
            return 8;
        }
        self.regs.pc = self.pop_u16(bus);
        20
    }

    /// Return from an interrupt handler. IME comes back without delay.
    pub(crate) fn reti(&mut self, bus: &mut impl Memory) -> u32 {
        self.regs.pc = self.pop_u16(bus);
        self.regs.ime = true;
        self.ime_scheduled = 0;
        16
    }
}
